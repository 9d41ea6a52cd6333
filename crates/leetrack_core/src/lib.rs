//! Core domain logic for the practice-problem review tracker.
//! This crate is the single source of truth for review-scheduling invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod search;
pub mod service;
pub mod stats;

pub use config::{ConfigError, LoggingConfig, ReviewConfig, TrackerConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::problem::{Difficulty, Problem, ProblemDraft, ProblemId, ProblemValidationError};
pub use model::review::{ReviewAction, ReviewState, TransitionError};
pub use repo::problem_repo::{
    ProblemRepository, RepoError, RepoResult, ReviewStateUpdate, SqliteProblemRepository,
    TopicGroup,
};
pub use schedule::{DayBoundary, DayWindow, ReviewIntervals, ScheduleOverflow};
pub use search::ProblemSearch;
pub use service::error::{TrackerError, TrackerResult};
pub use service::problem_service::ProblemService;
pub use service::query_service::ProblemQueryService;
pub use service::review_scheduler::ReviewScheduler;
pub use stats::{ProblemStats, TopicStats};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
