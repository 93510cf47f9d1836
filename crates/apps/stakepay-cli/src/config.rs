//! CLI configuration.
//!
//! ```toml
//! [rewards]
//! ethereum_first_block = 11050000
//! distribution_frequency_seconds = 1209600
//! reward_fraction_for_delegators = 0.7
//! max_recipients_per_rewards_tx = 50
//! delegate_address = "0x..."
//! granularity = "1000000000000000"
//! ```
//!
//! Every key is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use stakepay_ops::Configuration;
use std::path::Path;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Distribution parameters.
    pub rewards: Configuration,
}

impl CliConfig {
    /// Load and validate configuration from a file.
    ///
    /// Unlike the defaults, a file that was asked for must exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Check every value.
    pub fn validate(&self) -> CliResult<()> {
        self.rewards
            .validate()
            .map_err(|e| CliError::config(e.to_string()))
    }
}
