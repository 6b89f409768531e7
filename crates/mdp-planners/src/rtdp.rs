//! Real-Time Dynamic Programming
//!
//! Interleaves one-step Bellman backups with epsilon-greedy action selection
//! along simulated trajectories. The value table is filled lazily, seeded by
//! the heuristic on first access.

use std::collections::HashMap;

use mdp_core::{sample, Heuristic, MdpModel, PlanError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::planner::Planner;
use crate::schedule::EpsilonSchedule;

/// RTDP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtdpConfig {
    pub gamma: f64,
    pub episodes: u64,
    pub max_steps: u64,
    pub epsilon_schedule: EpsilonSchedule,
}

impl Default for RtdpConfig {
    fn default() -> Self {
        Self {
            gamma: 0.95,
            episodes: 50,
            max_steps: 1_000,
            epsilon_schedule: EpsilonSchedule::Greedy,
        }
    }
}

impl RtdpConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(PlanError::Config(format!(
                "rtdp.gamma must be within [0, 1], got {}",
                self.gamma
            )));
        }
        self.epsilon_schedule.validate()
    }
}

/// Summary of one training episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEpisode {
    pub episode: u64,
    pub steps: u64,
    pub epsilon: f64,
    pub start_value: f64,
}

/// Upper bound on the history reserved before training starts
const HISTORY_RESERVE: usize = 1024;

fn history_capacity(episodes: u64) -> usize {
    usize::try_from(episodes).map_or(HISTORY_RESERVE, |n| n.min(HISTORY_RESERVE))
}

/// RTDP agent
pub struct Rtdp<M: MdpModel, R = StdRng> {
    model: M,
    config: RtdpConfig,
    rng: R,
    heuristic: Heuristic<M::State>,
    values: HashMap<M::State, f64>,
}

impl<M: MdpModel> Rtdp<M, StdRng> {
    /// Agent with a seeded `StdRng` and no heuristic
    pub fn with_seed(model: M, config: RtdpConfig, seed: u64) -> Self {
        Self::new(
            model,
            config,
            StdRng::seed_from_u64(seed),
            Heuristic::Disabled,
        )
    }
}

impl<M: MdpModel, R: Rng> Rtdp<M, R> {
    pub fn new(model: M, config: RtdpConfig, rng: R, heuristic: Heuristic<M::State>) -> Self {
        Self {
            model,
            config,
            rng,
            heuristic,
            values: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RtdpConfig {
        &self.config
    }

    /// Value table populated so far
    pub fn values(&self) -> &HashMap<M::State, f64> {
        &self.values
    }

    /// Current estimate for `state`, inserting the heuristic value on first access
    pub fn value(&mut self, state: &M::State) -> f64 {
        if let Some(v) = self.values.get(state) {
            return *v;
        }
        let v = self.heuristic.initial_value(state);
        self.values.insert(state.clone(), v);
        v
    }

    /// One-step lookahead `Σ p · (r + γ · V(s'))`
    fn q_value(&mut self, state: &M::State, action: &M::Action) -> f64 {
        let gamma = self.config.gamma;
        self.model
            .transitions(state, action)
            .into_iter()
            .map(|t| t.probability * (t.reward + gamma * self.value(&t.next_state)))
            .sum()
    }

    /// Replace `V(state)` with `max_a Q(state, a)` and return it.
    /// States without actions are fixed at 0.
    pub fn bellman_backup(&mut self, state: &M::State) -> f64 {
        let actions = self.model.actions(state);
        if actions.is_empty() {
            self.values.insert(state.clone(), 0.0);
            return 0.0;
        }

        let mut max_q = f64::NEG_INFINITY;
        for action in &actions {
            let q = self.q_value(state, action);
            if q > max_q {
                max_q = q;
            }
        }
        self.values.insert(state.clone(), max_q);
        max_q
    }

    /// Maximizing action under the current value table; ties go to the
    /// first action listed. Draws nothing from the random source.
    pub fn greedy_action(&mut self, state: &M::State) -> Result<M::Action> {
        let actions = self.model.actions(state);
        let mut best: Option<(M::Action, f64)> = None;
        for action in actions {
            let q = self.q_value(state, &action);
            if best.as_ref().map_or(true, |(_, best_q)| q > *best_q) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
            .ok_or_else(|| PlanError::no_actions(state))
    }

    /// Epsilon-greedy selection: uniformly random action with probability
    /// `epsilon`, greedy otherwise
    pub fn select_action(&mut self, state: &M::State, epsilon: f64) -> Result<M::Action> {
        let mut actions = self.model.actions(state);
        if actions.is_empty() {
            return Err(PlanError::no_actions(state));
        }

        if self.rng.gen::<f64>() < epsilon {
            let idx = self.rng.gen_range(0..actions.len());
            return Ok(actions.swap_remove(idx));
        }

        self.greedy_action(state)
    }

    /// Training pass over `config.episodes` simulated trajectories
    pub fn run(&mut self) -> Result<Vec<TrainingEpisode>> {
        let mut history = Vec::with_capacity(history_capacity(self.config.episodes));

        for episode in 0..self.config.episodes {
            let mut state = self.model.initial_state();
            let epsilon = self.config.epsilon_schedule.value(episode);
            let mut steps = 0;

            while !self.model.is_terminal(&state) && steps < self.config.max_steps {
                self.bellman_backup(&state);
                let action = self.select_action(&state, epsilon)?;
                let (next, _reward) = sample(&self.model, &state, &action, &mut self.rng)?;
                state = next;
                steps += 1;
            }

            let start = self.model.start();
            let start_value = self.value(&start);
            info!(
                episode = episode + 1,
                steps,
                epsilon,
                start_value,
                "RTDP episode complete"
            );
            history.push(TrainingEpisode {
                episode: episode + 1,
                steps,
                epsilon,
                start_value,
            });
        }

        debug!(table_size = self.values.len(), "RTDP training finished");
        Ok(history)
    }
}

impl<M: MdpModel, R: Rng> Planner for Rtdp<M, R> {
    type State = M::State;
    type Action = M::Action;

    fn name(&self) -> &str {
        "rtdp"
    }

    fn plan(&mut self, state: &M::State) -> Result<M::Action> {
        self.select_action(state, 0.0)
    }
}
