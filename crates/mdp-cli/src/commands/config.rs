//! Configuration management commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{PlanConfig, CONFIG_FILE};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(explicit),
        ConfigCommands::Init { force } => init(force),
    }
}

fn show(explicit: Option<&Path>) -> Result<()> {
    let source = explicit
        .map(Path::to_path_buf)
        .or_else(PlanConfig::find_config_file);
    match &source {
        Some(path) => println!("# Config file: {}", path.display()),
        None => println!("# No configuration file found. Using defaults."),
    }

    let config = PlanConfig::load(explicit)?;
    println!("{}", config.to_toml()?);
    Ok(())
}

fn init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);

    if config_path.exists() && !force {
        println!("Configuration file already exists: {CONFIG_FILE}");
        println!("Use --force to overwrite");
        return Ok(());
    }

    let contents = PlanConfig::default().to_toml()?;
    std::fs::write(config_path, contents)
        .with_context(|| format!("Failed to write {CONFIG_FILE}"))?;
    println!("Configuration file created: {CONFIG_FILE}");

    Ok(())
}
