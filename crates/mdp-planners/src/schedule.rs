//! Exploration schedules for epsilon-greedy action selection

use mdp_core::{PlanError, Result};
use serde::{Deserialize, Serialize};

/// Linear interpolation from `start` to `end` over `steps` episodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearDecay {
    pub start: f64,
    pub end: f64,
    pub steps: u64,
}

impl LinearDecay {
    pub fn new(start: f64, end: f64, steps: u64) -> Self {
        Self { start, end, steps }
    }

    /// Value at episode `t`, clamped to `start` at or before 0 and to
    /// `end` at or after `steps`
    pub fn value(&self, t: u64) -> f64 {
        if t == 0 {
            return self.start;
        }
        if t >= self.steps {
            return self.end;
        }
        let frac = t as f64 / self.steps as f64;
        self.start + frac * (self.end - self.start)
    }
}

/// Episode index to exploration probability
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EpsilonSchedule {
    /// No exploration: always 0
    #[default]
    Greedy,
    Constant { epsilon: f64 },
    LinearDecay(LinearDecay),
}

impl EpsilonSchedule {
    pub fn value(&self, episode: u64) -> f64 {
        match self {
            Self::Greedy => 0.0,
            Self::Constant { epsilon } => *epsilon,
            Self::LinearDecay(decay) => decay.value(episode),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities: &[f64] = match self {
            Self::Greedy => &[],
            Self::Constant { epsilon } => &[*epsilon],
            Self::LinearDecay(d) => &[d.start, d.end],
        };
        for p in probabilities {
            if !(0.0..=1.0).contains(p) {
                return Err(PlanError::Config(format!(
                    "epsilon must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

impl From<LinearDecay> for EpsilonSchedule {
    fn from(decay: LinearDecay) -> Self {
        Self::LinearDecay(decay)
    }
}
