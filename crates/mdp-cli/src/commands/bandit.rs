//! Multi-armed bandit experiments

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use mdp_planners::{run_bandit, BanditReport, ExplorationOnly, Ucb};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    /// Upper confidence bound
    Ucb,
    /// Uniformly random arm
    Explore,
}

#[derive(Args)]
pub struct BanditArgs {
    /// Success probability of each Bernoulli arm
    #[arg(long, value_delimiter = ',', required = true)]
    arms: Vec<f64>,

    /// Arm selection strategy
    #[arg(long, value_enum, default_value_t = Strategy::Ucb)]
    strategy: Strategy,

    /// UCB exploration weight
    #[arg(long, default_value_t = Ucb::DEFAULT_C)]
    c: f64,

    /// Number of pulls
    #[arg(long, default_value_t = 1000)]
    pulls: u64,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: &BanditArgs) -> Result<()> {
    if args.c < 0.0 {
        bail!("--c must be non-negative, got {}", args.c);
    }

    let rng = &mut StdRng::seed_from_u64(args.seed);
    let n = args.arms.len();
    let report = match args.strategy {
        Strategy::Ucb => run_bandit(&mut Ucb::new(n, args.c), &args.arms, args.pulls, rng)?,
        Strategy::Explore => run_bandit(&mut ExplorationOnly::new(n), &args.arms, args.pulls, rng)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&args.arms, &report);
    }
    Ok(())
}

fn print_report(arms: &[f64], report: &BanditReport) {
    println!("Bandit ({})", report.strategy);
    println!("============\n");
    for (i, ((p, pulls), estimate)) in arms
        .iter()
        .zip(&report.pulls)
        .zip(&report.estimates)
        .enumerate()
    {
        println!("  arm {i}: p = {p:.2}, pulls = {pulls:>6}, estimate = {estimate:.3}");
    }
    println!();
    println!("Total reward: {}", report.total_reward);
    println!("Regret:       {:.2}", report.regret);
}
