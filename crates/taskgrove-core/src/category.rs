//! Health categorization and trend classification.
//!
//! Pure mappings from health values to the discrete buckets the UI and
//! notification layers consume. Boundaries are inclusive on the lower bound
//! of the higher category, so a health of exactly 75 is always `Healthy`.

use serde::{Deserialize, Serialize};

/// Minimum health-point movement between two samples before the trend is
/// considered to have changed at all. Policy tunable.
pub const TREND_THRESHOLD: u8 = 3;

/// Discrete health bucket for a tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthCategory {
    /// 75-100
    Healthy,
    /// 50-74
    SlightlyWilted,
    /// 25-49
    ModeratelyWilted,
    /// 0-24
    SeverelyWilted,
}

impl HealthCategory {
    /// Classify a health value (0-100) into its bucket.
    pub fn from_health(health: u8) -> Self {
        if health >= 75 {
            HealthCategory::Healthy
        } else if health >= 50 {
            HealthCategory::SlightlyWilted
        } else if health >= 25 {
            HealthCategory::ModeratelyWilted
        } else {
            HealthCategory::SeverelyWilted
        }
    }
}

/// Direction a tree's health is moving between two samples.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthTrend {
    /// Health rose by more than [`TREND_THRESHOLD`]
    Improving,
    /// Health moved by at most [`TREND_THRESHOLD`] in either direction
    Stable,
    /// Health fell by more than [`TREND_THRESHOLD`]
    Declining,
    /// Health fell by more than [`TREND_THRESHOLD`] and is severely wilted
    Critical,
}

impl HealthTrend {
    /// Classify the movement from `previous` to `current` health.
    pub fn from_samples(previous: u8, current: u8) -> Self {
        let delta = i16::from(current) - i16::from(previous);
        if delta > i16::from(TREND_THRESHOLD) {
            HealthTrend::Improving
        } else if delta < -i16::from(TREND_THRESHOLD) {
            if HealthCategory::from_health(current) == HealthCategory::SeverelyWilted {
                HealthTrend::Critical
            } else {
                HealthTrend::Declining
            }
        } else {
            HealthTrend::Stable
        }
    }
}
