mod config;
pub mod database;

pub use config::{Config, ScoringConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StorageError;
use crate::growth::GrowthUpdate;
use crate::model::{TaskSnapshot, TreeSnapshot};

/// Returns `~/.config/taskgrove[-dev]/` based on TASKGROVE_ENV.
///
/// Set TASKGROVE_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKGROVE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskgrove-dev")
    } else {
        base_dir.join("taskgrove")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Persistence seam between the scoring engine and its collaborators.
///
/// Supplies the snapshots a scoring pass reads and accepts the values it
/// writes back. The engine holds no state of its own across calls; write
/// serialization per tree is the implementor's responsibility.
pub trait GroveStore {
    /// Fetch a task snapshot by id.
    fn task(&self, id: &str) -> Result<Option<TaskSnapshot>, StorageError>;

    /// Fetch a tree snapshot by id.
    fn tree(&self, id: &str) -> Result<Option<TreeSnapshot>, StorageError>;

    /// Fetch the tree bound to a task, if any.
    fn tree_for_task(&self, task_id: &str) -> Result<Option<TreeSnapshot>, StorageError>;

    /// All trees currently bound to a task.
    fn trees_with_tasks(&self) -> Result<Vec<TreeSnapshot>, StorageError>;

    /// Write back a freshly computed health value for a tree.
    fn set_tree_health(&self, id: &str, health: u8) -> Result<(), StorageError>;

    /// Write back a growth-state advance for a tree.
    fn apply_growth(&self, id: &str, update: &GrowthUpdate) -> Result<(), StorageError>;

    /// Persist a task's reported progress (0-100).
    fn set_task_progress(&self, id: &str, progress: u8) -> Result<(), StorageError>;
}
