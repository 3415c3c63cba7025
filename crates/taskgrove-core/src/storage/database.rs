//! SQLite-backed task and tree storage.
//!
//! Provides persistent storage for:
//! - Task snapshots (status, deadline, reported progress)
//! - Tree state (health, growth stage, completed-task counter)
//! - The task/tree bindings the batch refresh walks
//!
//! Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use crate::error::StorageError;
use crate::growth::GrowthUpdate;
use crate::model::{TaskSnapshot, TaskStatus, TreeSnapshot};
use crate::storage::GroveStore;

/// SQLite database holding tasks and trees.
pub struct Database {
    conn: Connection,
}

fn format_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "PENDING",
        TaskStatus::InProgress => "IN_PROGRESS",
        TaskStatus::Completed => "COMPLETED",
    }
}

fn parse_status(status: &str) -> TaskStatus {
    match status {
        "IN_PROGRESS" => TaskStatus::InProgress,
        "COMPLETED" => TaskStatus::Completed,
        _ => TaskStatus::Pending,
    }
}

fn parse_ts(text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn task_from_row(row: &Row) -> rusqlite::Result<TaskSnapshot> {
    let status: String = row.get("status")?;
    let created_at: String = row.get("created_at")?;
    let due_date: Option<String> = row.get("due_date")?;
    let completed_at: Option<String> = row.get("completed_at")?;

    Ok(TaskSnapshot {
        id: row.get("id")?,
        title: row.get("title")?,
        status: parse_status(&status),
        created_at: parse_ts(&created_at)?,
        due_date: due_date.as_deref().map(parse_ts).transpose()?,
        progress: row.get("progress")?,
        completed_at: completed_at.as_deref().map(parse_ts).transpose()?,
    })
}

fn tree_from_row(row: &Row) -> rusqlite::Result<TreeSnapshot> {
    let last_watered: String = row.get("last_watered")?;

    Ok(TreeSnapshot {
        id: row.get("id")?,
        species: row.get("species")?,
        health_state: row.get("health_state")?,
        growth_stage: row.get("growth_stage")?,
        completed_tasks: row.get("completed_tasks")?,
        last_watered: parse_ts(&last_watered)?,
        task_id: row.get("task_id")?,
    })
}

impl Database {
    /// Open the database at `~/.config/taskgrove/taskgrove.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("taskgrove.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id           TEXT PRIMARY KEY,
                    title        TEXT NOT NULL,
                    status       TEXT NOT NULL DEFAULT 'PENDING',
                    created_at   TEXT NOT NULL,
                    due_date     TEXT,
                    progress     INTEGER,
                    completed_at TEXT
                );

                CREATE TABLE IF NOT EXISTS trees (
                    id              TEXT PRIMARY KEY,
                    species         TEXT NOT NULL,
                    health_state    INTEGER NOT NULL DEFAULT 100,
                    growth_stage    INTEGER NOT NULL DEFAULT 0,
                    completed_tasks INTEGER NOT NULL DEFAULT 0,
                    last_watered    TEXT NOT NULL,
                    task_id         TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_trees_task_id ON trees(task_id);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Insert a task snapshot.
    pub fn insert_task(&self, task: &TaskSnapshot) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, status, created_at, due_date, progress, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.title,
                format_status(task.status),
                task.created_at.to_rfc3339(),
                task.due_date.map(|d| d.to_rfc3339()),
                task.progress,
                task.completed_at.map(|d| d.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Insert a tree snapshot.
    pub fn insert_tree(&self, tree: &TreeSnapshot) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO trees (id, species, health_state, growth_stage, completed_tasks, last_watered, task_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                tree.id,
                tree.species,
                tree.health_state,
                tree.growth_stage,
                tree.completed_tasks,
                tree.last_watered.to_rfc3339(),
                tree.task_id,
            ],
        )?;
        Ok(())
    }

    /// List every task.
    pub fn list_tasks(&self) -> Result<Vec<TaskSnapshot>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM tasks ORDER BY created_at")?;
        let rows = stmt.query_map([], task_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// List every tree.
    pub fn list_trees(&self) -> Result<Vec<TreeSnapshot>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM trees ORDER BY last_watered")?;
        let rows = stmt.query_map([], tree_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Mark a task completed at `completed_at`.
    pub fn complete_task(&self, id: &str, completed_at: DateTime<Utc>) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = 'COMPLETED', progress = 100, completed_at = ?2 WHERE id = ?1",
            params![id, completed_at.to_rfc3339()],
        )?;
        Ok(changed > 0)
    }

    /// Delete a task. Bindings on trees are left in place; a dangling
    /// binding surfaces as a per-item NotFound during batch refresh.
    pub fn delete_task(&self, id: &str) -> Result<bool, StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl GroveStore for Database {
    fn task(&self, id: &str) -> Result<Option<TaskSnapshot>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
        Ok(stmt.query_row(params![id], task_from_row).optional()?)
    }

    fn tree(&self, id: &str) -> Result<Option<TreeSnapshot>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT * FROM trees WHERE id = ?1")?;
        Ok(stmt.query_row(params![id], tree_from_row).optional()?)
    }

    fn tree_for_task(&self, task_id: &str) -> Result<Option<TreeSnapshot>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM trees WHERE task_id = ?1 LIMIT 1")?;
        Ok(stmt.query_row(params![task_id], tree_from_row).optional()?)
    }

    fn trees_with_tasks(&self) -> Result<Vec<TreeSnapshot>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM trees WHERE task_id IS NOT NULL ORDER BY id")?;
        let rows = stmt.query_map([], tree_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn set_tree_health(&self, id: &str, health: u8) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE trees SET health_state = ?2 WHERE id = ?1",
            params![id, health],
        )?;
        Ok(())
    }

    fn apply_growth(&self, id: &str, update: &GrowthUpdate) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE trees SET growth_stage = ?2, completed_tasks = ?3, last_watered = ?4 WHERE id = ?1",
            params![
                id,
                update.growth_stage,
                update.completed_tasks,
                update.last_watered.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn set_task_progress(&self, id: &str, progress: u8) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE tasks SET progress = ?2 WHERE id = ?1",
            params![id, progress],
        )?;
        Ok(())
    }
}
