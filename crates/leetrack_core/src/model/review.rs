//! Review-state machine.
//!
//! # Responsibility
//! - Enumerate review checkpoints and the actions that move between them.
//! - Validate transitions centrally, independent of storage.
//!
//! # Invariants
//! - Advancing actions only move one checkpoint forward:
//!   `Unreviewed -> FirstReviewDone -> SecondReviewDone -> Mastered`.
//! - `Reset` is accepted from every state and always lands on `Unreviewed`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Checkpoint a problem has reached in its review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Solved once, no review recorded yet.
    Unreviewed,
    /// First review checkpoint passed.
    FirstReviewDone,
    /// Second review checkpoint passed.
    SecondReviewDone,
    /// Retained; no further review is scheduled.
    Mastered,
}

impl ReviewState {
    pub const ALL: [ReviewState; 4] = [
        ReviewState::Unreviewed,
        ReviewState::FirstReviewDone,
        ReviewState::SecondReviewDone,
        ReviewState::Mastered,
    ];

    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreviewed => "unreviewed",
            Self::FirstReviewDone => "first_review_done",
            Self::SecondReviewDone => "second_review_done",
            Self::Mastered => "mastered",
        }
    }

    /// Parses the storage name produced by [`ReviewState::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unreviewed" => Some(Self::Unreviewed),
            "first_review_done" => Some(Self::FirstReviewDone),
            "second_review_done" => Some(Self::SecondReviewDone),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }

    pub fn is_mastered(self) -> bool {
        matches!(self, Self::Mastered)
    }

    /// Whether a problem in this state must carry a next-review timestamp.
    ///
    /// `Unreviewed` is the only state where both are allowed: freshly
    /// created problems have no schedule, reset problems do.
    pub fn requires_schedule(self) -> bool {
        matches!(self, Self::FirstReviewDone | Self::SecondReviewDone)
    }

    /// Applies one action and returns the resulting state.
    ///
    /// # Errors
    /// - [`TransitionError`] when the current state is not the action's
    ///   required predecessor.
    pub fn apply(self, action: ReviewAction) -> Result<ReviewState, TransitionError> {
        match action.required_state() {
            Some(required) if required != self => Err(TransitionError {
                current: self,
                action,
                required,
            }),
            _ => Ok(action.target_state()),
        }
    }
}

impl Display for ReviewState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduler operation applied to one problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    FirstReview,
    SecondReview,
    Master,
    /// Restart the cycle from any state.
    Reset,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstReview => "first_review",
            Self::SecondReview => "second_review",
            Self::Master => "master",
            Self::Reset => "reset",
        }
    }

    /// Predecessor state the action insists on, `None` for `Reset`.
    pub fn required_state(self) -> Option<ReviewState> {
        match self {
            Self::FirstReview => Some(ReviewState::Unreviewed),
            Self::SecondReview => Some(ReviewState::FirstReviewDone),
            Self::Master => Some(ReviewState::SecondReviewDone),
            Self::Reset => None,
        }
    }

    pub fn target_state(self) -> ReviewState {
        match self {
            Self::FirstReview => ReviewState::FirstReviewDone,
            Self::SecondReview => ReviewState::SecondReviewDone,
            Self::Master => ReviewState::Mastered,
            Self::Reset => ReviewState::Unreviewed,
        }
    }
}

impl Display for ReviewAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub current: ReviewState,
    pub action: ReviewAction,
    pub required: ReviewState,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot apply `{}` from state `{}`; requires `{}`",
            self.action, self.current, self.required
        )
    }
}

impl Error for TransitionError {}
