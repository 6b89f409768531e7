//! Optional state-value heuristic

use std::fmt;

/// Frontier value estimate supplied to a planner
///
/// RTDP seeds unseen value-table entries with it, MCTS adds it at
/// non-terminal rollout cut-offs.
pub enum Heuristic<S> {
    Disabled,
    Function(Box<dyn Fn(&S) -> f64>),
}

impl<S> Heuristic<S> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&S) -> f64 + 'static,
    {
        Self::Function(Box::new(f))
    }

    /// Estimate for `state`, `None` when disabled
    pub fn estimate(&self, state: &S) -> Option<f64> {
        match self {
            Self::Disabled => None,
            Self::Function(f) => Some(f(state)),
        }
    }

    /// Initial value-table entry: the estimate, or 0
    pub fn initial_value(&self, state: &S) -> f64 {
        self.estimate(state).unwrap_or(0.0)
    }
}

impl<S> Default for Heuristic<S> {
    fn default() -> Self {
        Self::Disabled
    }
}

impl<S> fmt::Debug for Heuristic<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Heuristic::Disabled"),
            Self::Function(_) => f.write_str("Heuristic::Function(..)"),
        }
    }
}
