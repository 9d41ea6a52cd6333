//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the narrow record-store contract the services consume.
//! - Isolate SQLite query details from scheduling and query logic.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`, `StateConflict`)
//!   in addition to DB transport errors.

pub mod problem_repo;
