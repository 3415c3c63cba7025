//! Integration tests for the grove workflow.
//!
//! Exercises the full path from seeded storage through progress updates,
//! growth events, and health lookups using the public API only.

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskgrove_core::{
    Database, FixedClock, GroveService, GroveStore, HealthCategory, TaskSnapshot, TaskStatus,
    TreeSnapshot, MAX_GROWTH_STAGE,
};

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn seed(db: &Database) {
    let created = utc(2024, 3, 1);
    db.insert_task(&TaskSnapshot {
        id: "report".into(),
        title: "Quarterly report".into(),
        status: TaskStatus::InProgress,
        created_at: created,
        due_date: Some(created + Duration::days(10)),
        progress: Some(10),
        completed_at: None,
    })
    .unwrap();
    db.insert_tree(&TreeSnapshot {
        id: "oak-1".into(),
        species: "oak".into(),
        health_state: 50,
        growth_stage: 4,
        completed_tasks: 7,
        last_watered: created,
        task_id: Some("report".into()),
    })
    .unwrap();
}

#[test]
fn test_progress_update_then_health_lookup() {
    let db = Database::open_memory().unwrap();
    seed(&db);
    let service = GroveService::with_clock(db, FixedClock(utc(2024, 3, 6)));

    // Halfway through: expected progress 50, reported 80
    let update = service.update_task_progress("report", 80).unwrap();
    let change = update.tree.as_ref().unwrap();
    assert_eq!(change.health_before, 50);
    // base 50 + (80-50)/2 = 65, improving over 50 -> +10 bonus
    assert_eq!(change.health_after, 75);

    let details = service.tree_health("oak-1").unwrap();
    assert_eq!(details.health_state, 75);
    assert_eq!(details.health_category, HealthCategory::Healthy);
    let sched = details.details.unwrap();
    assert_eq!(sched.expected_progress, 50);
    assert_eq!(sched.actual_progress, Some(80));
}

#[test]
fn test_completion_drives_growth_to_terminal_stage() {
    let db = Database::open_memory().unwrap();
    seed(&db);
    let now = utc(2024, 3, 9);
    let service = GroveService::with_clock(db, FixedClock(now));

    assert!(service.store().complete_task("report", now).unwrap());

    // Two completion events: stage 4 -> 5, then stays at 5
    let first = service.grow_tree("oak-1", true).unwrap();
    assert_eq!(first.growth_stage, MAX_GROWTH_STAGE);
    assert_eq!(first.completed_tasks, 8);

    let second = service.grow_tree("oak-1", true).unwrap();
    assert_eq!(second.growth_stage, MAX_GROWTH_STAGE);
    assert_eq!(second.completed_tasks, 9);

    // Completed task pins the tree at full health on the next refresh
    let report = service.refresh_all().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.updated[0].health_after, 100);
    assert_eq!(
        service.store().tree("oak-1").unwrap().unwrap().health_state,
        100
    );
}

#[test]
fn test_overdue_task_decays_but_never_kills_the_tree() {
    let db = Database::open_memory().unwrap();
    seed(&db);
    // 20 days past a 10-day deadline
    let service = GroveService::with_clock(db, FixedClock(utc(2024, 3, 31)));

    let report = service.refresh_all().unwrap();
    assert_eq!(report.updated[0].health_after, 20);

    let details = service.tree_health("oak-1").unwrap();
    assert_eq!(details.health_category, HealthCategory::SeverelyWilted);
}
