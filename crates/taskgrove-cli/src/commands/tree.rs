//! Tree management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use taskgrove_core::storage::{Database, GroveStore};
use taskgrove_core::{stage_label, GroveService, TreeSnapshot};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TreeAction {
    /// Plant a new tree
    Plant {
        /// Species tag (cosmetic)
        species: String,
        /// Task to bind the tree to
        #[arg(long)]
        task_id: Option<String>,
    },
    /// List trees
    List,
    /// Get tree details
    Get {
        /// Tree ID
        id: String,
    },
    /// Advance the growth state machine
    Grow {
        /// Tree ID
        id: String,
        /// Watering tick only: refresh activity without a completed task
        #[arg(long)]
        watering: bool,
    },
}

pub fn run(action: TreeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TreeAction::Plant { species, task_id } => {
            let tree = TreeSnapshot {
                id: Uuid::new_v4().to_string(),
                species,
                health_state: 100,
                growth_stage: 0,
                completed_tasks: 0,
                last_watered: Utc::now(),
                task_id,
            };
            db.insert_tree(&tree)?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        TreeAction::List => {
            let trees = db.list_trees()?;
            println!("{}", serde_json::to_string_pretty(&trees)?);
        }
        TreeAction::Get { id } => match db.tree(&id)? {
            Some(tree) => {
                println!("{}", serde_json::to_string_pretty(&tree)?);
                println!("stage: {}", stage_label(tree.growth_stage));
            }
            None => return Err(format!("Tree not found: {id}").into()),
        },
        TreeAction::Grow { id, watering } => {
            let service = GroveService::new(db);
            let update = service.grow_tree(&id, !watering)?;
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
    }
    Ok(())
}
