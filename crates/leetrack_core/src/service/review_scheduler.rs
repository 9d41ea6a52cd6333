//! Review scheduler use-case service.
//!
//! # Responsibility
//! - Validate and apply review-state transitions.
//! - Compute next-review timestamps from configured intervals.
//!
//! # Invariants
//! - Checkpoints cannot be skipped or repeated; only `reset_timer`
//!   moves a problem backwards.
//! - State, schedule and audit stamp commit together or not at all.
//! - The scheduler holds no mutable state of its own.

use crate::model::problem::{Problem, ProblemId};
use crate::model::review::ReviewAction;
use crate::repo::problem_repo::{ProblemRepository, RepoError, ReviewStateUpdate};
use crate::schedule::ReviewIntervals;
use crate::service::error::{TrackerError, TrackerResult};
use chrono::{DateTime, Utc};
use log::{info, warn};

/// Drives problems through the review checkpoints.
pub struct ReviewScheduler<R: ProblemRepository> {
    repo: R,
    intervals: ReviewIntervals,
}

impl<R: ProblemRepository> ReviewScheduler<R> {
    pub fn new(repo: R, intervals: ReviewIntervals) -> Self {
        Self { repo, intervals }
    }

    pub fn intervals(&self) -> ReviewIntervals {
        self.intervals
    }

    /// `Unreviewed -> FirstReviewDone`, next review after the first interval.
    pub fn advance_to_first_review(&self, id: ProblemId) -> TrackerResult<Problem> {
        self.apply_at(id, ReviewAction::FirstReview, Utc::now())
    }

    /// `FirstReviewDone -> SecondReviewDone`, next review after the second
    /// interval.
    pub fn advance_to_second_review(&self, id: ProblemId) -> TrackerResult<Problem> {
        self.apply_at(id, ReviewAction::SecondReview, Utc::now())
    }

    /// `SecondReviewDone -> Mastered`, no further review.
    pub fn advance_to_mastered(&self, id: ProblemId) -> TrackerResult<Problem> {
        self.apply_at(id, ReviewAction::Master, Utc::now())
    }

    /// Any state `-> Unreviewed`, next review after the first interval.
    pub fn reset_timer(&self, id: ProblemId) -> TrackerResult<Problem> {
        self.apply_at(id, ReviewAction::Reset, Utc::now())
    }

    /// Applies `action` to problem `id` as of `now` and returns the
    /// updated record.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `InvalidTransition` when the problem is not in the action's
    ///   required predecessor state, including when a concurrent writer
    ///   moved it first. The record is left unchanged.
    /// - `ScheduleOverflow` when the configured interval cannot be added
    ///   to `now`. The record is left unchanged.
    /// - `StoreUnavailable` for store failures.
    pub fn apply_at(
        &self,
        id: ProblemId,
        action: ReviewAction,
        now: DateTime<Utc>,
    ) -> TrackerResult<Problem> {
        let current = self
            .repo
            .get_problem(id)?
            .ok_or(TrackerError::NotFound(id))?;

        let target = current.review_state.apply(action).map_err(|err| {
            warn!(
                "event=review_transition module=scheduler status=rejected problem_id={} action={} state={}",
                id, action, current.review_state
            );
            TrackerError::from_transition(id, err)
        })?;

        let next_review_at = self.intervals.next_review_at(target, now).map_err(|err| {
            warn!(
                "event=review_transition module=scheduler status=overflow problem_id={} action={}",
                id, action
            );
            TrackerError::ScheduleOverflow {
                id,
                state: err.state,
            }
        })?;

        let update = ReviewStateUpdate {
            id,
            expected: action.required_state(),
            state: target,
            next_review_at,
            changed_at: now.timestamp_millis(),
        };

        match self.repo.update_review_state(&update) {
            Ok(()) => {}
            Err(RepoError::StateConflict {
                expected, actual, ..
            }) => {
                warn!(
                    "event=review_transition module=scheduler status=conflict problem_id={} action={} state={}",
                    id, action, actual
                );
                return Err(TrackerError::InvalidTransition {
                    id,
                    current: actual,
                    attempted: action,
                    required: expected,
                });
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            "event=review_transition module=scheduler status=ok problem_id={} action={} from={} to={}",
            id, action, current.review_state, target
        );

        self.repo
            .get_problem(id)?
            .ok_or(TrackerError::NotFound(id))
    }
}
