//! Integration tests for the batch health refresh.
//!
//! The refresh must treat every tree independently: one bad binding is
//! reported, never aborting the rest of the batch.

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskgrove_core::{
    Database, FixedClock, GroveService, GroveStore, TaskSnapshot, TaskStatus, TreeSnapshot,
};

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn seed_pair(db: &Database, n: usize, due_in_days: i64) {
    let created = utc(2024, 3, 1);
    let task_id = format!("task-{n}");
    db.insert_task(&TaskSnapshot {
        id: task_id.clone(),
        title: format!("Task {n}"),
        status: TaskStatus::InProgress,
        created_at: created,
        due_date: Some(created + Duration::days(due_in_days)),
        progress: None,
        completed_at: None,
    })
    .unwrap();
    db.insert_tree(&TreeSnapshot {
        id: format!("tree-{n}"),
        species: "elm".into(),
        health_state: 90,
        growth_stage: 0,
        completed_tasks: 0,
        last_watered: created,
        task_id: Some(task_id),
    })
    .unwrap();
}

#[test]
fn test_one_dangling_binding_does_not_abort_the_batch() {
    let db = Database::open_memory().unwrap();
    for n in 0..5 {
        seed_pair(&db, n, 10);
    }
    // Delete one task out from under its tree
    assert!(db.delete_task("task-2").unwrap());

    let service = GroveService::with_clock(db, FixedClock(utc(2024, 3, 6)));
    let report = service.refresh_all().unwrap();

    assert_eq!(report.updated.len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].tree_id, "tree-2");
    assert!(report.failures[0].error.contains("task-2"));

    // The four healthy trees were rescored and persisted (halfway -> 50)
    for n in [0usize, 1, 3, 4] {
        let tree = service
            .store()
            .tree(&format!("tree-{n}"))
            .unwrap()
            .unwrap();
        assert_eq!(tree.health_state, 50);
    }
    // The failed tree keeps its stored health
    let stale = service.store().tree("tree-2").unwrap().unwrap();
    assert_eq!(stale.health_state, 90);
}

#[test]
fn test_unbound_trees_are_skipped() {
    let db = Database::open_memory().unwrap();
    seed_pair(&db, 0, 10);
    db.insert_tree(&TreeSnapshot {
        id: "lone-tree".into(),
        species: "fir".into(),
        health_state: 55,
        growth_stage: 2,
        completed_tasks: 2,
        last_watered: utc(2024, 3, 1),
        task_id: None,
    })
    .unwrap();

    let service = GroveService::with_clock(db, FixedClock(utc(2024, 3, 6)));
    let report = service.refresh_all().unwrap();

    assert_eq!(report.updated.len(), 1);
    assert!(report.is_clean());
    assert_eq!(
        service.store().tree("lone-tree").unwrap().unwrap().health_state,
        55
    );
}
