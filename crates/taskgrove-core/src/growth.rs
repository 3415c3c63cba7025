//! Growth state machine.
//!
//! A tree's discrete stage only ever moves forward, one step per completed
//! task, and saturates at [`MAX_GROWTH_STAGE`]. Decay is expressed through
//! the continuous health score, never by shrinking the stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::TreeSnapshot;

/// Terminal growth stage (fully grown). Stage 0 is a seed.
pub const MAX_GROWTH_STAGE: u8 = 5;

/// Result of advancing the growth state machine, ready for write-back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrowthUpdate {
    /// Stage after the event (0-5, non-decreasing)
    pub growth_stage: u8,
    /// Completed-task counter after the event
    pub completed_tasks: u32,
    /// Activity timestamp after the event
    pub last_watered: DateTime<Utc>,
}

/// Advance a tree in response to a task event at `now`.
///
/// A completion bumps the stage (saturating at [`MAX_GROWTH_STAGE`]) and the
/// completed-task counter; the counter keeps rising after the stage caps
/// out. A plain watering tick (`task_completed == false`) only refreshes the
/// activity timestamp.
pub fn grow(tree: &TreeSnapshot, task_completed: bool, now: DateTime<Utc>) -> GrowthUpdate {
    if task_completed {
        GrowthUpdate {
            growth_stage: tree.growth_stage.saturating_add(1).min(MAX_GROWTH_STAGE),
            completed_tasks: tree.completed_tasks + 1,
            last_watered: now,
        }
    } else {
        GrowthUpdate {
            growth_stage: tree.growth_stage,
            completed_tasks: tree.completed_tasks,
            last_watered: now,
        }
    }
}

/// Whether a stage is terminal.
pub fn is_fully_grown(stage: u8) -> bool {
    stage >= MAX_GROWTH_STAGE
}

/// Human-readable label for a stage, used by the CLI.
pub fn stage_label(stage: u8) -> &'static str {
    match stage {
        0 => "seed",
        1 => "sprout",
        2 => "sapling",
        3 => "young",
        4 => "mature",
        _ => "fully grown",
    }
}
