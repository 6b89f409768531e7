//! Environment model contract
//!
//! Any collaborator supplying a discrete Markov Decision Process implements
//! [`MdpModel`]. All methods are pure queries.

use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Allowed deviation of a transition distribution's total mass from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// One possible outcome of taking an action in a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    pub probability: f64,
    pub reward: f64,
    pub next_state: S,
}

impl<S> Transition<S> {
    pub fn new(probability: f64, reward: f64, next_state: S) -> Self {
        Self {
            probability,
            reward,
            next_state,
        }
    }
}

/// Markov Decision Process consumed by the planners
pub trait MdpModel {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Eq + Hash + Debug;

    /// Actions available in `state`, in a stable order.
    ///
    /// Non-empty for every non-terminal state.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Distribution over successors. Empty only for terminal states.
    fn transitions(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<Transition<Self::State>>;

    fn is_terminal(&self, state: &Self::State) -> bool;

    fn initial_state(&self) -> Self::State;

    /// State used for diagnostic reporting
    fn start(&self) -> Self::State {
        self.initial_state()
    }
}

impl<M: MdpModel + ?Sized> MdpModel for &M {
    type State = M::State;
    type Action = M::Action;

    fn actions(&self, state: &Self::State) -> Vec<Self::Action> {
        (**self).actions(state)
    }

    fn transitions(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<Transition<Self::State>> {
        (**self).transitions(state, action)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        (**self).is_terminal(state)
    }

    fn initial_state(&self) -> Self::State {
        (**self).initial_state()
    }

    fn start(&self) -> Self::State {
        (**self).start()
    }
}

/// Check that a transition list forms a probability distribution
pub fn validate_distribution<S: Debug, A: Debug>(
    state: &S,
    action: &A,
    transitions: &[Transition<S>],
    tolerance: f64,
) -> Result<()> {
    let sum: f64 = transitions.iter().map(|t| t.probability).sum();
    let negative = transitions.iter().any(|t| t.probability < 0.0);
    if negative || (sum - 1.0).abs() > tolerance {
        return Err(PlanError::InvalidDistribution {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
            sum,
        });
    }
    Ok(())
}

/// All states reachable from the initial state, in breadth-first order
pub fn reachable_states<M: MdpModel>(model: &M) -> Vec<M::State> {
    let initial = model.initial_state();
    let mut seen = HashSet::from([initial.clone()]);
    let mut queue = VecDeque::from([initial]);
    let mut order = Vec::new();

    while let Some(state) = queue.pop_front() {
        if !model.is_terminal(&state) {
            for action in model.actions(&state) {
                for t in model.transitions(&state, &action) {
                    if seen.insert(t.next_state.clone()) {
                        queue.push_back(t.next_state);
                    }
                }
            }
        }
        order.push(state);
    }

    order
}

/// Validate every reachable (state, action) distribution and that
/// non-terminal states expose at least one action
pub fn validate_model<M: MdpModel>(model: &M, tolerance: f64) -> Result<()> {
    for state in reachable_states(model) {
        if model.is_terminal(&state) {
            continue;
        }
        let actions = model.actions(&state);
        if actions.is_empty() {
            return Err(PlanError::no_actions(&state));
        }
        for action in &actions {
            let transitions = model.transitions(&state, action);
            if transitions.is_empty() {
                return Err(PlanError::no_transitions(&state, action));
            }
            validate_distribution(&state, action, &transitions, tolerance)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -> 1 -> 2 with a coin flip at 0
    struct Coin;

    impl MdpModel for Coin {
        type State = u8;
        type Action = char;

        fn actions(&self, state: &u8) -> Vec<char> {
            if *state < 2 {
                vec!['f']
            } else {
                vec![]
            }
        }

        fn transitions(&self, state: &u8, _action: &char) -> Vec<Transition<u8>> {
            match state {
                0 => vec![Transition::new(0.5, -1.0, 0), Transition::new(0.5, -1.0, 1)],
                1 => vec![Transition::new(1.0, -1.0, 2)],
                _ => vec![],
            }
        }

        fn is_terminal(&self, state: &u8) -> bool {
            *state == 2
        }

        fn initial_state(&self) -> u8 {
            0
        }
    }

    #[test]
    fn test_reachable_states_breadth_first() {
        assert_eq!(reachable_states(&Coin), vec![0, 1, 2]);
    }

    #[test]
    fn test_validate_model_accepts_distribution() {
        assert!(validate_model(&Coin, PROBABILITY_TOLERANCE).is_ok());
    }

    #[test]
    fn test_validate_distribution_rejects_short_mass() {
        let ts = vec![Transition::new(0.5, 0.0, 1), Transition::new(0.4, 0.0, 2)];
        let err = validate_distribution(&0, &'f', &ts, 1e-6).unwrap_err();
        match err {
            PlanError::InvalidDistribution { sum, .. } => assert!((sum - 0.9).abs() < 1e-12),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_distribution_rejects_negative_probability() {
        let ts = vec![Transition::new(1.5, 0.0, 1), Transition::new(-0.5, 0.0, 2)];
        assert!(validate_distribution(&0, &'f', &ts, 1e-6).is_err());
    }

    #[test]
    fn test_reference_is_a_model() {
        let model = &Coin;
        assert_eq!(MdpModel::initial_state(&model), 0);
        assert_eq!(MdpModel::start(&model), 0);
    }
}
