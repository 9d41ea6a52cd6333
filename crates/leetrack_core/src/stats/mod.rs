//! Aggregation engine.
//!
//! # Responsibility
//! - Derive overall and per-topic statistics from one problem snapshot.
//!
//! # Invariants
//! - Aggregation is pure: it never touches the store.
//! - Empty inputs produce zero counts and a zero mastery rate.

pub mod aggregate;

pub use aggregate::{compute_by_topic, compute_statistics, ProblemStats, TopicStats};
