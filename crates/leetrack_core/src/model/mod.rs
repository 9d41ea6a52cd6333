//! Domain model for tracked practice problems.
//!
//! # Responsibility
//! - Define the canonical problem record and its creation draft.
//! - Own the review-state machine used by the scheduler.
//!
//! # Invariants
//! - Every problem is identified by a store-assigned `ProblemId`.
//! - Deletion is a hard delete; there is no tombstone state.
//! - `next_review_at` always agrees with `review_state`.

pub mod problem;
pub mod review;
