//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Services are constructed explicitly and hold no mutable state.

pub mod error;
pub mod problem_service;
pub mod query_service;
pub mod review_scheduler;
