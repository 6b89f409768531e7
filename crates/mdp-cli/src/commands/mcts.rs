//! MCTS evaluation

use anyhow::{Context, Result};
use clap::Args;
use mdp_core::{Gridworld, MdpModel, Move};
use mdp_planners::{evaluate, EvaluationStats, Mcts};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::print_evaluation;
use crate::config::PlanConfig;

#[derive(Args)]
pub struct MctsArgs {
    /// Rollouts per search
    #[arg(long)]
    rollouts: Option<u64>,

    /// Evaluation episodes
    #[arg(long)]
    eval_episodes: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MctsOutput<'a> {
    rollouts_per_search: u64,
    root_action: Move,
    evaluation: &'a EvaluationStats,
}

pub fn run(args: MctsArgs, mut config: PlanConfig) -> Result<()> {
    if let Some(rollouts) = args.rollouts {
        config.mcts.rollouts_per_search = rollouts;
    }
    if let Some(episodes) = args.eval_episodes {
        config.evaluation.episodes = episodes;
    }
    if let Some(seed) = args.seed {
        config.evaluation.seed = seed;
    }
    config.mcts.validate()?;

    let grid = Gridworld::new(config.grid.clone()).context("Invalid gridworld")?;
    let seed = config.evaluation.seed;
    let mut agent = Mcts::with_seed(&grid, config.mcts.clone(), seed);

    let start = grid.initial_state();
    let outcome = agent.search_with_stats(&start)?;
    tracing::info!(
        rollouts = agent.config().rollouts_per_search,
        tree_size = outcome.tree_size,
        action = ?outcome.action,
        "Root search complete"
    );

    let rng = &mut StdRng::seed_from_u64(seed);
    let stats = evaluate(
        &grid,
        &mut agent,
        rng,
        config.evaluation.episodes,
        config.evaluation.max_steps,
    )?;

    if args.json {
        let output = MctsOutput {
            rollouts_per_search: agent.config().rollouts_per_search,
            root_action: outcome.action,
            evaluation: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Root search at {start}");
    println!("=====================\n");
    for child in &outcome.children {
        println!(
            "  {:<6} visits = {:>5}, Q = {:.3}",
            format!("{:?}", child.action),
            child.visits,
            child.q_value
        );
    }
    println!("\nChosen: {:?}\n", outcome.action);
    print_evaluation(&stats);

    Ok(())
}
