//! RTDP training and evaluation

use anyhow::{Context, Result};
use clap::Args;
use mdp_core::{Gridworld, MdpModel, Move};
use mdp_planners::{evaluate, EpsilonSchedule, EvaluationStats, Rtdp, TrainingEpisode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::print_evaluation;
use crate::config::PlanConfig;

#[derive(Args)]
pub struct RtdpArgs {
    /// Training episodes (also the length of a linear epsilon decay)
    #[arg(long)]
    episodes: Option<u64>,

    /// Greedy evaluation episodes after training
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
struct RtdpOutput<'a> {
    training: &'a [TrainingEpisode],
    policy: &'a str,
    evaluation: &'a EvaluationStats,
}

pub fn run(args: RtdpArgs, mut config: PlanConfig) -> Result<()> {
    if let Some(episodes) = args.episodes {
        config.rtdp.episodes = episodes;
        if let EpsilonSchedule::LinearDecay(decay) = &mut config.rtdp.epsilon_schedule {
            decay.steps = episodes;
        }
    }
    if let Some(episodes) = args.eval_episodes {
        config.evaluation.episodes = episodes;
    }
    if let Some(seed) = args.seed {
        config.evaluation.seed = seed;
    }
    config.rtdp.validate()?;

    let grid = Gridworld::new(config.grid.clone()).context("Invalid gridworld")?;
    let seed = config.evaluation.seed;
    let mut agent = Rtdp::with_seed(&grid, config.rtdp.clone(), seed);

    tracing::info!(episodes = agent.config().episodes, seed, "Training RTDP");
    let training = agent.run()?;
    let policy = greedy_policy(&grid, &mut agent);

    let rng = &mut StdRng::seed_from_u64(seed);
    let stats = evaluate(
        &grid,
        &mut agent,
        rng,
        config.evaluation.episodes,
        config.evaluation.max_steps,
    )?;

    if args.json {
        let output = RtdpOutput {
            training: &training,
            policy: &policy,
            evaluation: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Training");
    println!("========\n");
    for episode in &training {
        println!(
            "Episode {}: Steps = {}, Epsilon = {:.3}, V(start) = {:.3}",
            episode.episode, episode.steps, episode.epsilon, episode.start_value
        );
    }
    let start = grid.initial_state();
    println!("\nV{start} = {:.3}", agent.value(&start));
    println!("\nGreedy policy\n\n{policy}");
    print_evaluation(&stats);

    Ok(())
}

/// Arrow picture of the greedy action in every open cell
fn greedy_policy(grid: &Gridworld, agent: &mut Rtdp<&Gridworld>) -> String {
    grid.render(|cell| {
        agent
            .greedy_action(&cell)
            .map_or('.', Move::arrow)
    })
}
