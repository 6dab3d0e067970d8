use std::path::Path;

use crease_stats::InningsCreditPolicy;
use serde::{Deserialize, Serialize};

/// Tunables of the scoring engine, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Wickets that end an innings.
    pub max_wickets: u32,
    /// Default number of entries returned by rankings.
    pub ranking_limit: usize,
    /// Who gets match and innings credit when an innings closes.
    pub innings_credit: InningsCreditPolicy,
    /// Mark other pending transfers of a match superseded when one is
    /// accepted.
    pub supersede_pending_transfers: bool,
    /// Per-subscriber event buffer.
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_wickets: 10,
            ranking_limit: 20,
            innings_credit: InningsCreditPolicy::Roster,
            supersede_pending_transfers: true,
            channel_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take their
    /// defaults; unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_wickets == 0 {
            return Err(ConfigError::Validation("max_wickets must be at least 1".into()));
        }
        if self.ranking_limit == 0 {
            return Err(ConfigError::Validation("ranking_limit must be at least 1".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Validation(
                "channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}
