//! # Taskgrove Core Library
//!
//! Core business logic for Taskgrove, a task manager that renders each
//! tracked task as a tree whose vitality follows how well the task's
//! deadline is being honored. The CLI binary is a thin layer over this
//! library.
//!
//! ## Architecture
//!
//! - **Health Scoring**: a pure function of (task snapshot, tree snapshot,
//!   now) producing a 0-100 health value, expected progress, and time ratio.
//!   The clock is always passed in explicitly.
//! - **Growth State Machine**: advances a tree's discrete stage (0-5) and
//!   completed-task counter on task-completion events. Stages never regress.
//! - **Storage**: SQLite-backed task/tree store and TOML configuration for
//!   the scoring tunables.
//! - **Service**: scoring and growth applied to persisted state, including
//!   the batch refresh with per-item failure reporting.
//!
//! ## Key Components
//!
//! - [`HealthScorer`]: the scoring engine and its policy tunables
//! - [`GroveService`]: persisted-state operations over a [`GroveStore`]
//! - [`Database`]: SQLite store implementing [`GroveStore`]

pub mod category;
pub mod clock;
pub mod error;
pub mod forecast;
pub mod growth;
pub mod health;
pub mod model;
pub mod service;
pub mod storage;

pub use category::{HealthCategory, HealthTrend, TREND_THRESHOLD};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use forecast::{forecast, risk_level, ForecastPoint, HealthForecast};
pub use growth::{grow, is_fully_grown, stage_label, GrowthUpdate, MAX_GROWTH_STAGE};
pub use health::{HealthScorer, BEHIND_SLACK, HEALTH_FLOOR, RECOVERY_BONUS};
pub use model::{HealthReport, TaskSnapshot, TaskStatus, TreeSnapshot};
pub use service::{BatchFailure, BatchReport, GroveService, HealthChange, ProgressUpdate, TreeHealthDetails};
pub use storage::{Config, Database, GroveStore, ScoringConfig};
