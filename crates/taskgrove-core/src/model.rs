//! Snapshot types consumed and produced by the scoring engine.
//!
//! Snapshots are built fresh from persisted state for every scoring call and
//! are immutable once handed to the engine. The engine never mutates them;
//! write-back of computed values is the storage collaborator's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{HealthCategory, HealthTrend};

/// Lifecycle status of a tracked task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task exists but work has not started
    Pending,
    /// Task is being worked on
    InProgress,
    /// Task is done (terminal)
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Point-in-time view of a task, as supplied by the task provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Task identifier
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Current lifecycle status
    pub status: TaskStatus,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// Deadline, if one was set
    pub due_date: Option<DateTime<Utc>>,
    /// Self-reported completion percentage (0-100), if tracked
    pub progress: Option<u8>,
    /// When the task was completed, if it has been
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskSnapshot {
    /// Whether the task has reached its terminal status.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Point-in-time view of a tree, as supplied by the tree provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Tree identifier
    pub id: String,
    /// Species tag (cosmetic only; scoring never reads it)
    pub species: String,
    /// Current health value (0-100)
    pub health_state: u8,
    /// Current growth stage (0 = seed .. 5 = fully grown)
    pub growth_stage: u8,
    /// Number of tasks completed under this tree
    pub completed_tasks: u32,
    /// Last time the tree was watered or otherwise touched
    pub last_watered: DateTime<Utc>,
    /// Task currently bound to this tree, if any
    pub task_id: Option<String>,
}

/// Full output of one scoring pass over a task/tree pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Computed health value (0-100)
    pub health: u8,
    /// Progress the task "should" have reached by now (0-100)
    pub expected_progress: u8,
    /// Fraction of the task's allotted duration still remaining (0.0-1.0)
    pub time_ratio: f64,
    /// Category bucket for the computed health
    pub category: HealthCategory,
    /// Trend versus the tree's previously stored health, when one exists
    pub trend: Option<HealthTrend>,
}
