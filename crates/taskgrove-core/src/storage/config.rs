//! TOML-based application configuration.
//!
//! Holds the scoring policy tunables so deployments can adjust them without
//! a rebuild. Stored at `~/.config/taskgrove/config.toml`.

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::health::{HealthScorer, BEHIND_SLACK, HEALTH_FLOOR, RECOVERY_BONUS};

fn default_health_floor() -> f64 {
    HEALTH_FLOOR
}

fn default_recovery_bonus() -> f64 {
    RECOVERY_BONUS
}

fn default_behind_slack() -> f64 {
    BEHIND_SLACK
}

/// Scoring policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_health_floor")]
    pub health_floor: f64,
    #[serde(default = "default_recovery_bonus")]
    pub recovery_bonus: f64,
    #[serde(default = "default_behind_slack")]
    pub behind_slack: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            health_floor: HEALTH_FLOOR,
            recovery_bonus: RECOVERY_BONUS,
            behind_slack: BEHIND_SLACK,
        }
    }
}

impl ScoringConfig {
    /// Build a scorer from these tunables.
    pub fn scorer(&self) -> HealthScorer {
        HealthScorer {
            health_floor: self.health_floor,
            recovery_bonus: self.recovery_bonus,
            behind_slack: self.behind_slack,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/taskgrove/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(config)
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = data_dir()?.join("config.toml");
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
