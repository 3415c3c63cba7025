//! Grove service: scoring and growth applied to persisted state.
//!
//! Wraps a [`GroveStore`] with the operations collaborators call: health
//! detail lookup, progress updates with rescoring, growth events, and the
//! batch health refresh. Missing entities are precondition failures and
//! surface as distinct NotFound errors, never as silent no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::HealthCategory;
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result, ValidationError};
use crate::growth::{grow, GrowthUpdate};
use crate::health::HealthScorer;
use crate::model::TreeSnapshot;
use crate::storage::GroveStore;

/// Task block inside [`TreeHealthDetails`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundTask {
    pub id: String,
    pub title: String,
    pub progress: Option<u8>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Schedule detail block, present when the bound task has a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDetails {
    pub time_ratio: f64,
    pub expected_progress: u8,
    pub actual_progress: Option<u8>,
}

/// Health detail view for one tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeHealthDetails {
    pub tree_id: String,
    pub health_state: u8,
    pub health_category: HealthCategory,
    pub last_updated: DateTime<Utc>,
    pub task: Option<BoundTask>,
    pub details: Option<ScheduleDetails>,
}

/// Before/after health for one tree touched by a write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChange {
    pub tree_id: String,
    pub health_before: u8,
    pub health_after: u8,
}

impl HealthChange {
    /// Signed delta, e.g. "+12" or "-5".
    pub fn delta(&self) -> String {
        let delta = i16::from(self.health_after) - i16::from(self.health_before);
        if delta > 0 {
            format!("+{delta}")
        } else {
            delta.to_string()
        }
    }
}

/// Result of a progress update, including the rescored tree when one is
/// bound to the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub task_id: String,
    pub progress: u8,
    pub updated_at: DateTime<Utc>,
    pub tree: Option<HealthChange>,
}

/// One failed item in a batch refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub tree_id: String,
    pub error: String,
}

/// Aggregate outcome of a batch health refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub updated: Vec<HealthChange>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// True when every item succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Service applying the scoring engine to a [`GroveStore`].
pub struct GroveService<S, C = SystemClock> {
    store: S,
    scorer: HealthScorer,
    clock: C,
}

impl<S: GroveStore> GroveService<S> {
    /// Create a service over `store` with the default scorer and the
    /// system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: GroveStore, C: Clock> GroveService<S, C> {
    /// Create a service with an injected clock (tests pin time this way).
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            scorer: HealthScorer::new(),
            clock,
        }
    }

    /// Replace the default scoring tunables.
    pub fn with_scorer(mut self, scorer: HealthScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn require_tree(&self, tree_id: &str) -> Result<TreeSnapshot> {
        self.store.tree(tree_id)?.ok_or_else(|| CoreError::TreeNotFound {
            id: tree_id.to_string(),
        })
    }

    /// Health detail view for a tree, including schedule details when a
    /// task with a deadline is bound.
    pub fn tree_health(&self, tree_id: &str) -> Result<TreeHealthDetails> {
        let tree = self.require_tree(tree_id)?;
        let now = self.clock.now();

        let mut details = TreeHealthDetails {
            tree_id: tree.id.clone(),
            health_state: tree.health_state,
            health_category: HealthCategory::from_health(tree.health_state),
            last_updated: tree.last_watered,
            task: None,
            details: None,
        };

        if let Some(task_id) = &tree.task_id {
            if let Some(task) = self.store.task(task_id)? {
                if task.due_date.is_some() {
                    details.details = Some(ScheduleDetails {
                        time_ratio: self.scorer.compute_time_ratio(&task, now),
                        expected_progress: self.scorer.compute_expected_progress(&task, now),
                        actual_progress: task.progress,
                    });
                }
                details.task = Some(BoundTask {
                    id: task.id,
                    title: task.title,
                    progress: task.progress,
                    deadline: task.due_date,
                });
            }
        }

        Ok(details)
    }

    /// Record a task's reported progress and rescore its bound tree.
    pub fn update_task_progress(&self, task_id: &str, progress: u8) -> Result<ProgressUpdate> {
        if progress > 100 {
            return Err(ValidationError::InvalidValue {
                field: "progress".into(),
                message: format!("must be 0-100, got {progress}"),
            }
            .into());
        }

        let mut task = self.store.task(task_id)?.ok_or_else(|| CoreError::TaskNotFound {
            id: task_id.to_string(),
        })?;

        self.store.set_task_progress(task_id, progress)?;
        task.progress = Some(progress);

        let now = self.clock.now();
        let tree_change = match self.store.tree_for_task(task_id)? {
            Some(tree) => {
                let health_after = self.scorer.compute_health(&task, &tree, now);
                self.store.set_tree_health(&tree.id, health_after)?;
                Some(HealthChange {
                    tree_id: tree.id,
                    health_before: tree.health_state,
                    health_after,
                })
            }
            None => None,
        };

        Ok(ProgressUpdate {
            task_id: task_id.to_string(),
            progress,
            updated_at: now,
            tree: tree_change,
        })
    }

    /// Advance a tree's growth state machine and persist the result.
    ///
    /// `task_completed == false` is a watering tick: only the activity
    /// timestamp moves.
    pub fn grow_tree(&self, tree_id: &str, task_completed: bool) -> Result<GrowthUpdate> {
        let tree = self.require_tree(tree_id)?;
        let update = grow(&tree, task_completed, self.clock.now());
        self.store.apply_growth(tree_id, &update)?;
        Ok(update)
    }

    /// Recompute and persist health for every tree bound to a task.
    ///
    /// Items fail independently: a tree whose task has vanished is reported
    /// in the failure list while the rest of the batch proceeds.
    pub fn refresh_all(&self) -> Result<BatchReport> {
        let now = self.clock.now();
        let mut report = BatchReport::default();

        for tree in self.store.trees_with_tasks()? {
            let task_id = match &tree.task_id {
                Some(id) => id.clone(),
                None => continue,
            };

            let outcome = self.refresh_one(&tree, &task_id, now);
            match outcome {
                Ok(change) => report.updated.push(change),
                Err(e) => report.failures.push(BatchFailure {
                    tree_id: tree.id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        Ok(report)
    }

    fn refresh_one(
        &self,
        tree: &TreeSnapshot,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<HealthChange> {
        let task = self.store.task(task_id)?.ok_or_else(|| CoreError::TaskNotFound {
            id: task_id.to_string(),
        })?;

        let health_after = self.scorer.compute_health(&task, tree, now);
        self.store.set_tree_health(&tree.id, health_after)?;
        Ok(HealthChange {
            tree_id: tree.id.clone(),
            health_before: tree.health_state,
            health_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::{TaskSnapshot, TaskStatus};
    use crate::storage::Database;
    use chrono::{Duration, TimeZone};

    fn utc_datetime(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn seed_task(db: &Database, id: &str, due_in_days: Option<i64>, progress: Option<u8>) {
        let created = utc_datetime(2024, 3, 1, 0);
        db.insert_task(&TaskSnapshot {
            id: id.into(),
            title: format!("Task {id}"),
            status: TaskStatus::InProgress,
            created_at: created,
            due_date: due_in_days.map(|d| created + Duration::days(d)),
            progress,
            completed_at: None,
        })
        .unwrap();
    }

    fn seed_tree(db: &Database, id: &str, health: u8, task_id: Option<&str>) {
        db.insert_tree(&crate::model::TreeSnapshot {
            id: id.into(),
            species: "oak".into(),
            health_state: health,
            growth_stage: 1,
            completed_tasks: 1,
            last_watered: utc_datetime(2024, 3, 1, 0),
            task_id: task_id.map(String::from),
        })
        .unwrap();
    }

    fn service_at(db: Database, now: DateTime<Utc>) -> GroveService<Database, FixedClock> {
        GroveService::with_clock(db, FixedClock(now))
    }

    #[test]
    fn test_tree_health_details_with_bound_task() {
        let db = Database::open_memory().unwrap();
        seed_task(&db, "t1", Some(10), Some(30));
        seed_tree(&db, "tr1", 80, Some("t1"));
        let service = service_at(db, utc_datetime(2024, 3, 6, 0));

        let details = service.tree_health("tr1").unwrap();
        assert_eq!(details.health_state, 80);
        assert_eq!(details.health_category, HealthCategory::Healthy);
        let task = details.task.unwrap();
        assert_eq!(task.id, "t1");
        let sched = details.details.unwrap();
        assert_eq!(sched.expected_progress, 50);
        assert_eq!(sched.actual_progress, Some(30));
        assert!((sched.time_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tree_health_missing_tree_is_not_found() {
        let db = Database::open_memory().unwrap();
        let service = service_at(db, utc_datetime(2024, 3, 6, 0));

        match service.tree_health("ghost") {
            Err(CoreError::TreeNotFound { id }) => assert_eq!(id, "ghost"),
            other => panic!("expected TreeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_update_task_progress_rescores_bound_tree() {
        let db = Database::open_memory().unwrap();
        seed_task(&db, "t1", Some(10), Some(10));
        seed_tree(&db, "tr1", 40, Some("t1"));
        // Halfway through the schedule, bumping progress to 90
        let service = service_at(db, utc_datetime(2024, 3, 6, 0));

        let update = service.update_task_progress("t1", 90).unwrap();
        assert_eq!(update.progress, 90);
        let change = update.tree.unwrap();
        assert_eq!(change.health_before, 40);
        // base 50 + (90-50)/2 = 70, improving over 40 -> +10 bonus
        assert_eq!(change.health_after, 80);
        assert_eq!(change.delta(), "+40");
        assert_eq!(
            service.store().tree("tr1").unwrap().unwrap().health_state,
            80
        );
        assert_eq!(
            service.store().task("t1").unwrap().unwrap().progress,
            Some(90)
        );
    }

    #[test]
    fn test_update_task_progress_validates_range() {
        let db = Database::open_memory().unwrap();
        seed_task(&db, "t1", Some(10), None);
        let service = service_at(db, utc_datetime(2024, 3, 6, 0));

        assert!(matches!(
            service.update_task_progress("t1", 101),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            service.update_task_progress("ghost", 50),
            Err(CoreError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn test_grow_tree_persists_and_signals_missing() {
        let db = Database::open_memory().unwrap();
        seed_tree(&db, "tr1", 70, None);
        let now = utc_datetime(2024, 3, 10, 0);
        let service = service_at(db, now);

        let update = service.grow_tree("tr1", true).unwrap();
        assert_eq!(update.growth_stage, 2);
        assert_eq!(update.completed_tasks, 2);
        assert_eq!(update.last_watered, now);

        let stored = service.store().tree("tr1").unwrap().unwrap();
        assert_eq!(stored.growth_stage, 2);

        assert!(matches!(
            service.grow_tree("ghost", true),
            Err(CoreError::TreeNotFound { .. })
        ));
    }

    #[test]
    fn test_watering_tick_keeps_stage() {
        let db = Database::open_memory().unwrap();
        seed_tree(&db, "tr1", 70, None);
        let now = utc_datetime(2024, 3, 10, 0);
        let service = service_at(db, now);

        let update = service.grow_tree("tr1", false).unwrap();
        assert_eq!(update.growth_stage, 1);
        assert_eq!(update.completed_tasks, 1);
        assert_eq!(update.last_watered, now);
    }

    #[test]
    fn test_refresh_all_collects_per_item_failures() {
        let db = Database::open_memory().unwrap();
        seed_task(&db, "t1", Some(10), None);
        seed_task(&db, "t2", Some(10), None);
        seed_tree(&db, "tr1", 50, Some("t1"));
        seed_tree(&db, "tr2", 50, Some("t2"));
        // tr3 is bound to a task that was deleted
        seed_tree(&db, "tr3", 50, Some("gone"));

        let service = service_at(db, utc_datetime(2024, 3, 6, 0));
        let report = service.refresh_all().unwrap();

        assert_eq!(report.updated.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(report.failures[0].tree_id, "tr3");
        assert!(report.failures[0].error.contains("gone"));

        // The healthy items were persisted despite the failure
        for change in &report.updated {
            assert_eq!(change.health_after, 50);
            assert_eq!(
                service
                    .store()
                    .tree(&change.tree_id)
                    .unwrap()
                    .unwrap()
                    .health_state,
                50
            );
        }
    }
}
