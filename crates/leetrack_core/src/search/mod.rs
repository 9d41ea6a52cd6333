//! Problem search entry points.
//!
//! # Responsibility
//! - Build and validate SQL `LIKE` patterns for title/topic search.
//! - Keep wildcard escaping inside core.

pub mod pattern;

pub use pattern::ProblemSearch;
