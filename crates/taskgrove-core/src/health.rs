//! Deadline-driven health scoring.
//!
//! A tree's health tracks how well its bound task is honoring its deadline.
//! Scoring is a pure function of the task snapshot, the tree's previously
//! stored health, and an explicit `now` — callers inject the clock, so the
//! same inputs at the same instant always produce the same output.
//!
//! ## Scoring pipeline
//!
//! 1. Completed tasks are always at full health (100).
//! 2. No deadline, or a deadline at/before creation, carries the stored
//!    health forward unchanged — there is no signal to act on.
//! 3. Otherwise health starts from the fraction of allotted time remaining,
//!    decays toward the floor once overdue, is adjusted by how actual
//!    progress compares to expected progress, and earns a recovery bonus
//!    when it comes out above the previously stored value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{HealthCategory, HealthTrend};
use crate::model::{HealthReport, TaskSnapshot, TreeSnapshot};

/// Lowest health an incomplete task with a deadline can drive a tree to.
/// The tree never visually dies, which keeps finishing late worthwhile.
pub const HEALTH_FLOOR: f64 = 20.0;

/// Bonus pool granted when a fresh score improves on the stored health.
/// Half of it is applied per scoring pass, smoothing single-step recoveries.
pub const RECOVERY_BONUS: f64 = 20.0;

/// Fraction of expected progress a task may lag behind before the
/// behind-schedule penalty kicks in. Absorbs small, expected variance.
pub const BEHIND_SLACK: f64 = 0.8;

/// Health scorer with named policy tunables.
///
/// The defaults reproduce the canonical scoring behavior; the fields exist
/// so the tunables stay visible and testable rather than buried as literals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthScorer {
    /// Minimum health while a deadline exists and the task is incomplete
    pub health_floor: f64,
    /// Recovery bonus pool; applied at half strength per pass
    pub recovery_bonus: f64,
    /// Slack factor before the behind-schedule penalty applies
    pub behind_slack: f64,
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self {
            health_floor: HEALTH_FLOOR,
            recovery_bonus: RECOVERY_BONUS,
            behind_slack: BEHIND_SLACK,
        }
    }
}

impl HealthScorer {
    /// Create a scorer with the default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the health value (0-100) for a task/tree pair at `now`.
    ///
    /// Completed tasks score exactly 100. Tasks without a usable deadline
    /// (none set, or due at/before creation) carry `tree.health_state`
    /// forward unchanged. Every other result lands in
    /// `[health_floor, 100]`.
    pub fn compute_health(
        &self,
        task: &TaskSnapshot,
        tree: &TreeSnapshot,
        now: DateTime<Utc>,
    ) -> u8 {
        if task.is_completed() {
            return 100;
        }

        let due = match task.due_date {
            Some(due) => due,
            None => return tree.health_state,
        };

        let total_ms = (due - task.created_at).num_milliseconds() as f64;
        if total_ms <= 0.0 {
            // Degenerate deadline; no ratio can be derived
            return tree.health_state;
        }

        let remaining_ms = (due - now).num_milliseconds() as f64;
        let time_ratio = (remaining_ms / total_ms).clamp(0.0, 1.0);

        let mut health = if remaining_ms <= 0.0 {
            // Overdue: decay with how far past the deadline we are,
            // capped at one full duration, never below the floor
            let overdue_factor = (remaining_ms.abs() / total_ms).min(1.0);
            let penalty_span = 100.0 - self.health_floor;
            (100.0 - overdue_factor * penalty_span).max(self.health_floor)
        } else {
            (time_ratio * 100.0).clamp(self.health_floor, 100.0)
        };

        if let Some(progress) = task.progress {
            let progress = f64::from(progress);
            let expected = 100.0 - time_ratio * 100.0;
            if progress > expected {
                health = (health + (progress - expected) / 2.0).min(100.0);
            } else if progress < expected * self.behind_slack {
                health = (health - (expected - progress) / 2.0).max(self.health_floor);
            }
        }

        // Recovery bonus: improving on the stored health earns half the
        // bonus pool, applied after the schedule adjustment and before
        // rounding
        if f64::from(tree.health_state) < health {
            health = (health + self.recovery_bonus * 0.5).min(100.0);
        }

        health.round() as u8
    }

    /// Progress the task "should" have reached by `now`, 0-100.
    ///
    /// Returns 0 when no deadline exists (nothing is expected yet) and 100
    /// when the deadline is at or before creation (everything was due
    /// immediately).
    pub fn compute_expected_progress(&self, task: &TaskSnapshot, now: DateTime<Utc>) -> u8 {
        let due = match task.due_date {
            Some(due) => due,
            None => return 0,
        };

        let total_ms = (due - task.created_at).num_milliseconds() as f64;
        if total_ms <= 0.0 {
            return 100;
        }

        let remaining_ms = (due - now).num_milliseconds() as f64;
        let time_ratio = (remaining_ms / total_ms).clamp(0.0, 1.0);
        (100.0 - time_ratio * 100.0).round() as u8
    }

    /// Fraction of the task's allotted duration still remaining at `now`.
    ///
    /// 1.0 means no deadline pressure (including "no deadline at all");
    /// 0.0 means the deadline has passed or the allotted duration was
    /// non-positive.
    pub fn compute_time_ratio(&self, task: &TaskSnapshot, now: DateTime<Utc>) -> f64 {
        let due = match task.due_date {
            Some(due) => due,
            None => return 1.0,
        };

        let total_ms = (due - task.created_at).num_milliseconds() as f64;
        if total_ms <= 0.0 {
            return 0.0;
        }

        let remaining_ms = (due - now).num_milliseconds() as f64;
        (remaining_ms / total_ms).clamp(0.0, 1.0)
    }

    /// Run a full scoring pass and bundle the results.
    ///
    /// The trend compares the fresh health to the tree's stored
    /// `health_state`, which serves as the previous sample.
    pub fn score(&self, task: &TaskSnapshot, tree: &TreeSnapshot, now: DateTime<Utc>) -> HealthReport {
        let health = self.compute_health(task, tree, now);
        HealthReport {
            health,
            expected_progress: self.compute_expected_progress(task, now),
            time_ratio: self.compute_time_ratio(task, now),
            category: HealthCategory::from_health(health),
            trend: Some(HealthTrend::from_samples(tree.health_state, health)),
        }
    }
}
