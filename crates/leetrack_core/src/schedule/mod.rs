//! Review timing rules.
//!
//! # Responsibility
//! - Turn configured intervals into concrete next-review timestamps.
//! - Resolve "today" into a half-open millisecond window.
//!
//! # Invariants
//! - Intervals are configuration, never persisted state.
//! - Windows are half-open: `start <= t < end`.

pub mod window;

pub use window::{DayBoundary, DayWindow};

use crate::model::review::ReviewState;
use chrono::{DateTime, Duration, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_FIRST_INTERVAL_DAYS: u32 = 7;
pub const DEFAULT_SECOND_INTERVAL_DAYS: u32 = 20;
/// Longest configurable interval (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// `now + interval` falls outside the representable time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOverflow {
    pub state: ReviewState,
}

impl Display for ScheduleOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "next review for state `{}` is out of the supported time range",
            self.state
        )
    }
}

impl Error for ScheduleOverflow {}

/// Offsets added to the transition time when a checkpoint is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewIntervals {
    /// Used after the first review and after a reset.
    pub first: Duration,
    /// Used after the second review.
    pub second: Duration,
}

impl ReviewIntervals {
    pub fn from_days(first_days: u32, second_days: u32) -> Self {
        Self {
            first: Duration::days(i64::from(first_days)),
            second: Duration::days(i64::from(second_days)),
        }
    }

    /// Computes `next_review_at` (epoch ms) for a problem that just
    /// entered `state` at `now`.
    ///
    /// Returns `Ok(None)` for `Mastered`: nothing further is scheduled.
    ///
    /// # Errors
    /// - [`ScheduleOverflow`] when the offset runs past chrono's range.
    pub fn next_review_at(
        &self,
        state: ReviewState,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, ScheduleOverflow> {
        let offset = match state {
            ReviewState::Unreviewed | ReviewState::FirstReviewDone => self.first,
            ReviewState::SecondReviewDone => self.second,
            ReviewState::Mastered => return Ok(None),
        };
        now.checked_add_signed(offset)
            .map(|at| Some(at.timestamp_millis()))
            .ok_or(ScheduleOverflow { state })
    }
}

impl Default for ReviewIntervals {
    fn default() -> Self {
        Self::from_days(DEFAULT_FIRST_INTERVAL_DAYS, DEFAULT_SECOND_INTERVAL_DAYS)
    }
}
