//! MDP Core - Environment model contract, transition sampling and shared types
//!
//! This crate provides the foundational types consumed by the planning agents:
//! the [`MdpModel`] trait, [`Transition`], the inverse-CDF [`sample`] function,
//! the optional [`Heuristic`] capability and a stochastic [`Gridworld`].

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod gridworld;
pub mod heuristic;
pub mod model;
pub mod sampler;

pub use error::{PlanError, Result};
pub use gridworld::{Cell, GridConfig, Gridworld, Move};
pub use heuristic::Heuristic;
pub use model::{
    reachable_states, validate_distribution, validate_model, MdpModel, Transition,
    PROBABILITY_TOLERANCE,
};
pub use sampler::sample;
