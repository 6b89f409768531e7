//! Configuration loading for the MDP driver

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use mdp_core::GridConfig;
use mdp_planners::{EpsilonSchedule, LinearDecay, MctsConfig, RtdpConfig};
use serde::{Deserialize, Serialize};

/// Name of the local configuration file
pub const CONFIG_FILE: &str = "mdp.toml";

/// Effective driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub evaluation: EvaluationConfig,
    pub grid: GridConfig,
    pub rtdp: RtdpConfig,
    pub mcts: MctsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Greedy episodes run after training
    pub episodes: usize,
    pub max_steps: u64,
    /// Seeds every random source in a run
    pub seed: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            episodes: 20,
            max_steps: 1000,
            seed: 0,
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        let rtdp = RtdpConfig::default();
        let decay = LinearDecay::new(0.5, 0.05, rtdp.episodes);
        Self {
            evaluation: EvaluationConfig::default(),
            grid: GridConfig::default(),
            rtdp: RtdpConfig {
                epsilon_schedule: EpsilonSchedule::from(decay),
                ..rtdp
            },
            mcts: MctsConfig {
                rollouts_per_search: 200,
                ..MctsConfig::default()
            },
        }
    }
}

impl PlanConfig {
    /// Load configuration from file and environment.
    ///
    /// `explicit` (from `--config`) wins over the search path.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };

        let env = Environment::with_prefix("MDP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        Self::from_sources(path.as_deref(), Some(env))
    }

    fn from_sources(path: Option<&Path>, env: Option<Environment>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: Self = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: MDP_CONFIG env, ./mdp.toml, ~/.config/mdp/mdp.toml
        if let Ok(path) = std::env::var("MDP_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("mdp").join(CONFIG_FILE);
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate().context("Invalid [grid] section")?;
        self.rtdp.validate().context("Invalid [rtdp] section")?;
        self.mcts.validate().context("Invalid [mcts] section")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
