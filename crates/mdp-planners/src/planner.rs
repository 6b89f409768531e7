//! Planner trait shared by the RTDP and MCTS agents

use mdp_core::Result;

/// Trait for planning agents
///
/// A driver repeatedly asks the planner for an action at the current state,
/// advances the simulated episode and feeds the new state back.
pub trait Planner {
    type State;
    type Action;

    /// Planner name
    fn name(&self) -> &str;

    /// Choose an action for `state`
    fn plan(&mut self, state: &Self::State) -> Result<Self::Action>;
}
