//! Integration tests for the planning agents
//!
//! These tests drive RTDP and MCTS against a small chain MDP and the default
//! gridworld through the public API only.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

use mdp_core::{
    reachable_states, sample, validate_model, Cell, GridConfig, Gridworld, Heuristic, MdpModel,
    PlanError, Transition, PROBABILITY_TOLERANCE,
};
use mdp_planners::{
    evaluate, EpsilonSchedule, LinearDecay, Mcts, MctsConfig, Planner, Rtdp, RtdpConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Spot {
    Start,
    Middle,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Step {
    Forward,
    Back,
}

/// Three-state linear chain, deterministic, each step costs 1
struct Chain;

impl MdpModel for Chain {
    type State = Spot;
    type Action = Step;

    fn actions(&self, state: &Spot) -> Vec<Step> {
        match state {
            Spot::Goal => vec![],
            _ => vec![Step::Back, Step::Forward],
        }
    }

    fn transitions(&self, state: &Spot, action: &Step) -> Vec<Transition<Spot>> {
        let next = match (state, action) {
            (Spot::Start, Step::Forward) => Spot::Middle,
            (Spot::Middle, Step::Forward) => Spot::Goal,
            (Spot::Start | Spot::Middle, Step::Back) => Spot::Start,
            (Spot::Goal, _) => return vec![],
        };
        vec![Transition::new(1.0, -1.0, next)]
    }

    fn is_terminal(&self, state: &Spot) -> bool {
        *state == Spot::Goal
    }

    fn initial_state(&self) -> Spot {
        Spot::Start
    }
}

fn default_grid() -> Gridworld {
    Gridworld::new(GridConfig::default()).expect("default grid is valid")
}

/// Manhattan distance to the goal, as a negative cost-to-go estimate
fn manhattan(goal: Cell) -> impl Fn(&Cell) -> f64 {
    move |c: &Cell| -((c.row.abs_diff(goal.row) + c.col.abs_diff(goal.col)) as f64)
}

#[test]
fn test_models_are_distributions() {
    assert!(validate_model(&Chain, PROBABILITY_TOLERANCE).is_ok());
    let grid = default_grid();
    assert!(validate_model(&grid, PROBABILITY_TOLERANCE).is_ok());

    for state in reachable_states(&grid) {
        for action in grid.actions(&state) {
            let mass: f64 = grid
                .transitions(&state, &action)
                .iter()
                .map(|t| t.probability)
                .sum();
            assert!((mass - 1.0).abs() < 1e-9, "{state} {action:?} sums to {mass}");
        }
    }
}

#[test]
fn test_rtdp_chain_values() {
    let config = RtdpConfig {
        episodes: 3,
        ..RtdpConfig::default()
    };
    let mut agent = Rtdp::with_seed(Chain, config, 42);
    agent.run().unwrap();

    let start = agent.value(&Spot::Start);
    let middle = agent.value(&Spot::Middle);
    let goal = agent.value(&Spot::Goal);
    assert!(start < middle, "start {start} middle {middle}");
    assert!(middle < goal);
    assert_eq!(goal, 0.0);
    assert_eq!(agent.plan(&Spot::Start).unwrap(), Step::Forward);
}

#[test]
fn test_mcts_chain_search() {
    let config = MctsConfig {
        rollouts_per_search: 100,
        max_depth: 2,
        ..MctsConfig::default()
    };
    let mut agent = Mcts::with_seed(Chain, config, 42);
    assert_eq!(agent.search(&Spot::Middle).unwrap(), Step::Forward);
    assert_eq!(agent.search(&Spot::Start).unwrap(), Step::Forward);

    let err = agent.search(&Spot::Goal).unwrap_err();
    assert!(matches!(err, PlanError::NoActions(_)));
}

#[test]
fn test_mcts_root_visits_match_rollouts_on_grid() {
    let config = MctsConfig {
        rollouts_per_search: 120,
        ..MctsConfig::default()
    };
    let grid = default_grid();
    let mut agent = Mcts::with_seed(&grid, config, 5);
    let outcome = agent.search_with_stats(&grid.initial_state()).unwrap();

    assert_eq!(outcome.children.len(), 4);
    assert!(outcome.children.iter().all(|c| c.visits >= 1));
    assert_eq!(outcome.children.iter().map(|c| c.visits).sum::<u64>(), 120);
    assert_eq!(outcome.root_visits, 120);
}

#[test]
fn test_rtdp_solves_gridworld() {
    let grid = default_grid();
    let config = RtdpConfig {
        episodes: 50,
        epsilon_schedule: EpsilonSchedule::from(LinearDecay::new(0.5, 0.05, 50)),
        ..RtdpConfig::default()
    };
    let mut agent = Rtdp::with_seed(&grid, config, 0);
    let history = agent.run().unwrap();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].epsilon, 0.5);

    let rng = &mut StdRng::seed_from_u64(1);
    let stats = evaluate(&grid, &mut agent, rng, 20, 1_000).unwrap();
    assert_eq!(stats.success_rate, 1.0);
    // Shortest path is 8 moves; slips add a few
    assert!(stats.mean_steps < 25.0, "mean steps {}", stats.mean_steps);
}

#[test]
fn test_rtdp_heuristic_seeds_table() {
    let grid = default_grid();
    let mut agent = Rtdp::new(
        &grid,
        RtdpConfig::default(),
        StdRng::seed_from_u64(0),
        Heuristic::from_fn(manhattan(grid.goal())),
    );
    assert_eq!(agent.value(&Cell::new(0, 0)), -8.0);
    assert_eq!(agent.value(&Cell::new(4, 3)), -1.0);
}

#[test]
fn test_mcts_reaches_grid_goal() {
    let grid = default_grid();
    let config = MctsConfig {
        rollouts_per_search: 150,
        max_depth: 30,
        ..MctsConfig::default()
    };
    let mut agent = Mcts::new(
        &grid,
        config,
        StdRng::seed_from_u64(0),
        Heuristic::from_fn(manhattan(grid.goal())),
    );

    let rng = &mut StdRng::seed_from_u64(1);
    let stats = evaluate(&grid, &mut agent, rng, 3, 500).unwrap();
    assert_eq!(stats.success_rate, 1.0);
}

#[test]
fn test_driver_loop_is_reproducible() {
    let run = || {
        let grid = default_grid();
        let mut agent = Rtdp::with_seed(&grid, RtdpConfig::default(), 7);
        agent.run().unwrap();
        let rng = &mut StdRng::seed_from_u64(7);
        let mut state = grid.initial_state();
        let mut trace = vec![state];
        while !grid.is_terminal(&state) && trace.len() < 200 {
            let action = agent.plan(&state).unwrap();
            state = sample(&grid, &state, &action, rng).unwrap().0;
            trace.push(state);
        }
        trace
    };
    assert_eq!(run(), run());
}
