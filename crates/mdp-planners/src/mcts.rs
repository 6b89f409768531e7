//! Monte-Carlo Tree Search with UCT selection
//!
//! Every call to [`Mcts::search`] grows a fresh tree rooted at the query
//! state, repeating select / expand / rollout / backpropagate, and answers
//! with the most visited root action.

use mdp_core::{sample, Heuristic, MdpModel, PlanError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::planner::Planner;
use crate::tree::{Node, NodeId, SearchTree};

/// How a newly expanded child picks its state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// Successor of the first listed transition, regardless of probability
    #[default]
    FirstTransition,
    /// Successor drawn proportionally to transition probability
    Sampled,
}

/// MCTS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    pub gamma: f64,
    pub c_uct: f64,
    pub rollouts_per_search: u64,
    pub max_depth: u64,
    pub expansion: ExpansionPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            gamma: 0.95,
            c_uct: 1.4,
            rollouts_per_search: 500,
            max_depth: 200,
            expansion: ExpansionPolicy::FirstTransition,
        }
    }
}

impl MctsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(PlanError::Config(format!(
                "mcts.gamma must be within [0, 1], got {}",
                self.gamma
            )));
        }
        if !self.c_uct.is_finite() || self.c_uct < 0.0 {
            return Err(PlanError::Config(format!(
                "mcts.c_uct must be a non-negative number, got {}",
                self.c_uct
            )));
        }
        if self.rollouts_per_search == 0 {
            return Err(PlanError::Config(
                "mcts.rollouts_per_search must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Statistics of one root child after a search
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub visits: u64,
    pub q_value: f64,
}

/// Result of a search: the chosen action and the root statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<A> {
    pub action: A,
    pub root_visits: u64,
    /// Root children in expansion order
    pub children: Vec<ChildStats<A>>,
    pub tree_size: usize,
}

/// MCTS agent
pub struct Mcts<M: MdpModel, R = StdRng> {
    model: M,
    config: MctsConfig,
    rng: R,
    heuristic: Heuristic<M::State>,
}

impl<M: MdpModel> Mcts<M, StdRng> {
    /// Agent with a seeded `StdRng` and no heuristic
    pub fn with_seed(model: M, config: MctsConfig, seed: u64) -> Self {
        Self::new(
            model,
            config,
            StdRng::seed_from_u64(seed),
            Heuristic::Disabled,
        )
    }
}

/// UCT score of `child` under a parent visited `parent_visits` times.
/// Unvisited children score `+inf` so each is tried once.
fn uct_score<S, A>(c_uct: f64, parent_visits: u64, child: &Node<S, A>) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    debug_assert!(parent_visits > 0, "scored a child of an unvisited node");
    let exploration = c_uct * ((parent_visits as f64).ln() / child.visits as f64).sqrt();
    child.q_value() + exploration
}

impl<M: MdpModel, R: Rng> Mcts<M, R> {
    pub fn new(model: M, config: MctsConfig, rng: R, heuristic: Heuristic<M::State>) -> Self {
        Self {
            model,
            config,
            rng,
            heuristic,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Descend by UCT until a terminal or not fully expanded node
    fn select(&self, tree: &SearchTree<M::State, M::Action>) -> NodeId {
        let mut id = tree.root();
        loop {
            let node = tree.node(id);
            if self.model.is_terminal(&node.state) {
                return id;
            }
            if node.children.len() < self.model.actions(&node.state).len() {
                return id;
            }

            let mut best: Option<(NodeId, f64)> = None;
            for (_, child_id) in &node.children {
                let score = uct_score(self.config.c_uct, node.visits, tree.node(*child_id));
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((*child_id, score));
                }
            }

            match best {
                Some((child_id, _)) => id = child_id,
                None => return id,
            }
        }
    }

    /// Attach a child for a random untried action; returns `id` itself
    /// when nothing is left to expand
    fn expand(&mut self, tree: &mut SearchTree<M::State, M::Action>, id: NodeId) -> Result<NodeId> {
        let state = tree.node(id).state.clone();
        let untried: Vec<M::Action> = self
            .model
            .actions(&state)
            .into_iter()
            .filter(|a| !tree.has_child(id, a))
            .collect();

        let Some(action) = untried.choose(&mut self.rng).cloned() else {
            return Ok(id);
        };

        let next_state = match self.config.expansion {
            // The first listed successor, not a probability-weighted draw.
            ExpansionPolicy::FirstTransition => self
                .model
                .transitions(&state, &action)
                .into_iter()
                .next()
                .map_or_else(|| state.clone(), |t| t.next_state),
            ExpansionPolicy::Sampled => {
                sample(&self.model, &state, &action, &mut self.rng)?.0
            }
        };

        Ok(tree.add_child(id, action, next_state))
    }

    /// Discounted return of a uniformly random walk from `state`
    fn rollout(&mut self, state: &M::State) -> Result<f64> {
        let mut state = state.clone();
        let mut total = 0.0;
        let mut discount = 1.0;
        let mut depth = 0;

        while !self.model.is_terminal(&state) && depth < self.config.max_depth {
            let actions = self.model.actions(&state);
            let Some(action) = actions.choose(&mut self.rng) else {
                break;
            };
            let (next, reward) = sample(&self.model, &state, action, &mut self.rng)?;
            total += discount * reward;
            discount *= self.config.gamma;
            state = next;
            depth += 1;
        }

        if !self.model.is_terminal(&state) {
            if let Some(estimate) = self.heuristic.estimate(&state) {
                total += discount * estimate;
            }
        }
        Ok(total)
    }

    /// Credit `value` to `id` and every ancestor, discounting by γ per level
    fn backpropagate(&self, tree: &mut SearchTree<M::State, M::Action>, id: NodeId, value: f64) {
        let mut current = Some(id);
        let mut value = value;
        while let Some(id) = current {
            let node = tree.node_mut(id);
            node.visits += 1;
            node.value_sum += value;
            current = node.parent.as_ref().map(|(parent, _)| *parent);
            value *= self.config.gamma;
        }
    }

    /// Run a full search from `root_state` and report root statistics
    pub fn search_with_stats(&mut self, root_state: &M::State) -> Result<SearchOutcome<M::Action>> {
        let mut tree = SearchTree::new(root_state.clone());

        for _ in 0..self.config.rollouts_per_search {
            let leaf = self.select(&tree);
            let child = self.expand(&mut tree, leaf)?;
            let state = tree.node(child).state.clone();
            let value = self.rollout(&state)?;
            self.backpropagate(&mut tree, child, value);
        }

        let root = tree.root();
        let children: Vec<ChildStats<M::Action>> = tree
            .children(root)
            .map(|(action, node)| ChildStats {
                action: action.clone(),
                visits: node.visits,
                q_value: node.q_value(),
            })
            .collect();

        let mut best: Option<&ChildStats<M::Action>> = None;
        for stats in &children {
            if best.map_or(true, |b| stats.visits > b.visits) {
                best = Some(stats);
            }
        }

        let action = match best {
            Some(stats) => stats.action.clone(),
            None => self
                .model
                .actions(root_state)
                .into_iter()
                .next()
                .ok_or_else(|| PlanError::no_actions(root_state))?,
        };

        let root_visits = tree.node(root).visits;
        debug!(
            ?root_state,
            ?action,
            root_visits,
            tree_size = tree.len(),
            "MCTS search complete"
        );

        Ok(SearchOutcome {
            action,
            root_visits,
            children,
            tree_size: tree.len(),
        })
    }

    /// Most visited root action after `rollouts_per_search` iterations
    pub fn search(&mut self, root_state: &M::State) -> Result<M::Action> {
        self.search_with_stats(root_state).map(|outcome| outcome.action)
    }
}

impl<M: MdpModel, R: Rng> Planner for Mcts<M, R> {
    type State = M::State;
    type Action = M::Action;

    fn name(&self) -> &str {
        "mcts"
    }

    fn plan(&mut self, state: &M::State) -> Result<M::Action> {
        self.search(state)
    }
}
