//! MDP CLI - Command line driver for the planning agents
//!
//! Trains and evaluates RTDP and MCTS on the configured gridworld and runs
//! small multi-armed-bandit experiments.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{bandit, mcts, rtdp};
use crate::config::PlanConfig;

#[derive(Parser)]
#[command(name = "mdp")]
#[command(author, version, about = "MDP - planning under uncertainty with RTDP and MCTS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (overrides MDP_CONFIG and the default search path)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train RTDP on the gridworld and evaluate its greedy policy
    Rtdp(rtdp::RtdpArgs),

    /// Evaluate MCTS on the gridworld
    Mcts(mcts::MctsArgs),

    /// Run a multi-armed bandit experiment
    Bandit(bandit::BanditArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mdp_cli={log_level},mdp_planners={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Rtdp(args) => rtdp::run(args, PlanConfig::load(config_path)?),
        Commands::Mcts(args) => mcts::run(args, PlanConfig::load(config_path)?),
        Commands::Bandit(args) => bandit::run(&args),
        Commands::Config(cmd) => commands::config::run(cmd, config_path),
    }
}
