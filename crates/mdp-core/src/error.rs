//! Error types for MDP planning

use thiserror::Error;

/// Main error type for MDP planning
///
/// Every variant points at a malformed environment model, a misuse of an
/// agent, or a bad configuration. None of them are retried.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("search called on terminal/actionless state: {0}")]
    NoActions(String),

    #[error("no transitions for action {action} in state {state}")]
    NoTransitions { state: String, action: String },

    #[error("transition probabilities for action {action} in state {state} sum to {sum}, expected 1")]
    InvalidDistribution {
        state: String,
        action: String,
        sum: f64,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlanError {
    pub fn no_actions<S: std::fmt::Debug>(state: &S) -> Self {
        Self::NoActions(format!("{state:?}"))
    }

    pub fn no_transitions<S: std::fmt::Debug, A: std::fmt::Debug>(state: &S, action: &A) -> Self {
        Self::NoTransitions {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        }
    }
}

/// Result type alias for planning operations
pub type Result<T> = std::result::Result<T, PlanError>;
