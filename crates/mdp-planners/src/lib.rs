//! MDP Planners - Planning under uncertainty over discrete MDPs
//!
//! This crate provides two interchangeable planning agents consuming the
//! same [`mdp_core::MdpModel`]: Real-Time Dynamic Programming ([`Rtdp`]) and
//! Monte-Carlo Tree Search ([`Mcts`]), plus an episode runner and simple
//! multi-armed-bandit arm selectors.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod bandit;
pub mod episode;
pub mod mcts;
pub mod planner;
pub mod rtdp;
pub mod schedule;
mod tree;

pub use bandit::{run_bandit, ArmSelector, BanditReport, ExplorationOnly, Ucb};
pub use episode::{evaluate, run_episode, EpisodeReport, EvaluationStats};
pub use mcts::{ChildStats, ExpansionPolicy, Mcts, MctsConfig, SearchOutcome};
pub use planner::Planner;
pub use rtdp::{Rtdp, RtdpConfig, TrainingEpisode};
pub use schedule::{EpsilonSchedule, LinearDecay};
