//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use taskgrove_core::storage::{Database, GroveStore};
use taskgrove_core::{GroveService, TaskSnapshot, TaskStatus};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Deadline (RFC 3339, e.g. 2024-06-01T00:00:00Z)
        #[arg(long)]
        due: Option<String>,
        /// Initial progress percentage (0-100)
        #[arg(long)]
        progress: Option<u8>,
    },
    /// List tasks
    List,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Report task progress and rescore the bound tree
    Progress {
        /// Task ID
        id: String,
        /// Progress percentage (0-100)
        value: u8,
    },
    /// Mark a task completed and grow its tree
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Create {
            title,
            due,
            progress,
        } => {
            let due_date = due
                .map(|d| DateTime::parse_from_rfc3339(&d).map(|dt| dt.with_timezone(&Utc)))
                .transpose()?;
            let task = TaskSnapshot {
                id: Uuid::new_v4().to_string(),
                title,
                status: TaskStatus::Pending,
                created_at: Utc::now(),
                due_date,
                progress,
                completed_at: None,
            };
            db.insert_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            let tasks = db.list_tasks()?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match db.task(&id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => return Err(format!("Task not found: {id}").into()),
        },
        TaskAction::Progress { id, value } => {
            let service = GroveService::new(db);
            let update = service.update_task_progress(&id, value)?;
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
        TaskAction::Complete { id } => {
            let now = Utc::now();
            if !db.complete_task(&id, now)? {
                return Err(format!("Task not found: {id}").into());
            }
            let bound_tree = db.tree_for_task(&id)?;
            let service = GroveService::new(db);
            match bound_tree {
                Some(tree) => {
                    let update = service.grow_tree(&tree.id, true)?;
                    println!("{}", serde_json::to_string_pretty(&update)?);
                }
                None => println!("Task completed: {id}"),
            }
        }
        TaskAction::Delete { id } => {
            if !db.delete_task(&id)? {
                return Err(format!("Task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
