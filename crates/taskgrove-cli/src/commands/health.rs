//! Health scoring commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use taskgrove_core::storage::{Config, Database, GroveStore};
use taskgrove_core::{forecast, risk_level, GroveService};

#[derive(Subcommand)]
pub enum HealthAction {
    /// Show a tree's health details
    Show {
        /// Tree ID
        id: String,
    },
    /// Recompute and persist health for every bound tree
    Refresh,
    /// Project a tree's health trajectory
    Forecast {
        /// Tree ID
        id: String,
    },
}

pub fn run(action: HealthAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let scorer = Config::load()?.scoring.scorer();

    match action {
        HealthAction::Show { id } => {
            let service = GroveService::new(db).with_scorer(scorer);
            let details = service.tree_health(&id)?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        HealthAction::Refresh => {
            let service = GroveService::new(db).with_scorer(scorer);
            let report = service.refresh_all()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_clean() {
                return Err(format!("{} tree(s) failed to refresh", report.failures.len()).into());
            }
        }
        HealthAction::Forecast { id } => {
            let tree = db
                .tree(&id)?
                .ok_or_else(|| format!("Tree not found: {id}"))?;
            let task_id = tree
                .task_id
                .clone()
                .ok_or_else(|| format!("Tree has no bound task: {id}"))?;
            let task = db
                .task(&task_id)?
                .ok_or_else(|| format!("Task not found: {task_id}"))?;

            let now = Utc::now();
            let fc = forecast(&scorer, &task, &tree, now);
            println!("{}", serde_json::to_string_pretty(&fc)?);
            println!("risk: {}", risk_level(&scorer, &task, now));
        }
    }
    Ok(())
}
