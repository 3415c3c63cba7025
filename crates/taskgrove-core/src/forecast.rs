//! Health forecasting and risk assessment.
//!
//! Projects where a tree's health is heading if the task keeps its current
//! progress rate, and condenses deadline pressure plus progress deficit into
//! a single risk figure. Both are advisory outputs for the UI/notification
//! layers; nothing here is persisted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::category::HealthTrend;
use crate::health::HealthScorer;
use crate::model::{TaskSnapshot, TreeSnapshot};

/// Maximum number of projected points per forecast.
const MAX_FORECAST_POINTS: i64 = 3;

/// One projected health sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Instant the projection applies to
    pub date: DateTime<Utc>,
    /// Projected health value (0-100)
    pub health: u8,
}

/// Forecast for a task/tree pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthForecast {
    /// Where health is heading right now
    pub current_trend: HealthTrend,
    /// Projected health at future instants (empty when there is nothing
    /// to project: task completed, no deadline, or already past due)
    pub estimated: Vec<ForecastPoint>,
    /// Progress the task should be at to stay on schedule
    pub recommended_progress: u8,
}

/// Project health for a task/tree pair as of `now`.
///
/// Completed and deadline-less tasks have nothing to project. Past-due
/// tasks are flagged critical with an immediate-completion recommendation.
/// Otherwise the forecast assumes the task keeps its current progress rate
/// and samples health at daily (under a week left) or weekly intervals.
pub fn forecast(
    scorer: &HealthScorer,
    task: &TaskSnapshot,
    tree: &TreeSnapshot,
    now: DateTime<Utc>,
) -> HealthForecast {
    let due = match task.due_date {
        Some(due) if !task.is_completed() => due,
        _ => {
            return HealthForecast {
                current_trend: HealthTrend::Stable,
                estimated: Vec::new(),
                recommended_progress: task.progress.unwrap_or(0),
            };
        }
    };

    if now > due {
        return HealthForecast {
            current_trend: HealthTrend::Critical,
            estimated: Vec::new(),
            recommended_progress: 100,
        };
    }

    let time_ratio = scorer.compute_time_ratio(task, now);
    let expected = 100.0 - time_ratio * 100.0;

    let current_trend = match task.progress {
        None => HealthTrend::Declining,
        Some(progress) => {
            let progress = f64::from(progress);
            if progress >= expected {
                HealthTrend::Improving
            } else if progress >= expected * 0.8 {
                HealthTrend::Stable
            } else if progress >= expected * 0.5 {
                HealthTrend::Declining
            } else {
                HealthTrend::Critical
            }
        }
    };

    let remaining = due - now;
    let days_to_deadline = (remaining.num_hours() as f64 / 24.0).ceil() as i64;
    let interval_days = if days_to_deadline <= 7 { 1 } else { 7 };
    let num_points =
        MAX_FORECAST_POINTS.min((days_to_deadline as f64 / interval_days as f64).ceil() as i64);

    // Progress per unit of elapsed schedule, assuming the rate so far holds
    let elapsed_fraction = 1.0 - time_ratio;
    let progress_rate = match task.progress {
        Some(progress) if elapsed_fraction > 0.0 => f64::from(progress) / elapsed_fraction,
        _ => 0.0,
    };
    let days_total = (due - task.created_at).num_hours() as f64 / 24.0;

    let mut estimated = Vec::new();
    for i in 1..=num_points {
        let days_from_now = (i * interval_days) as f64;
        let future_date = now + Duration::days(i * interval_days);

        let mut future_task = task.clone();
        if let Some(progress) = task.progress {
            let projected =
                f64::from(progress) + (progress_rate * days_from_now / days_total) * 100.0;
            future_task.progress = Some(projected.min(100.0) as u8);
        }

        estimated.push(ForecastPoint {
            date: future_date,
            health: scorer.compute_health(&future_task, tree, future_date),
        });
    }

    HealthForecast {
        current_trend,
        estimated,
        recommended_progress: expected.ceil() as u8,
    }
}

/// Risk level (0-100) for a task as of `now`; higher is riskier.
///
/// Weighted 60% deadline pressure, 40% progress deficit. Completed tasks
/// carry no risk; deadline-less tasks sit at a flat medium-low 30; past-due
/// tasks are maximal.
pub fn risk_level(scorer: &HealthScorer, task: &TaskSnapshot, now: DateTime<Utc>) -> u8 {
    if task.is_completed() {
        return 0;
    }
    let due = match task.due_date {
        Some(due) => due,
        None => return 30,
    };
    if now > due {
        return 100;
    }

    let time_ratio = scorer.compute_time_ratio(task, now);
    let expected = f64::from(scorer.compute_expected_progress(task, now));
    let deficit = match task.progress {
        Some(progress) => (expected - f64::from(progress)).max(0.0),
        None => expected,
    };

    let time_risk = 1.0 - time_ratio;
    let progress_risk = deficit / 100.0;
    (time_risk * 60.0 + progress_risk * 40.0).round() as u8
}
