//! Outward error type for tracker use-cases.
//!
//! # Invariants
//! - "No such row" from the store always surfaces as `NotFound`.
//! - Store failures are passed through untouched and never retried here.

use crate::model::problem::{ProblemId, ProblemValidationError};
use crate::model::review::{ReviewAction, ReviewState, TransitionError};
use crate::repo::problem_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Error kinds returned by scheduler, query and lifecycle operations.
#[derive(Debug)]
pub enum TrackerError {
    /// Referenced problem does not exist.
    NotFound(ProblemId),
    /// Requested action does not match the problem's current state.
    InvalidTransition {
        id: ProblemId,
        current: ReviewState,
        attempted: ReviewAction,
        required: ReviewState,
    },
    /// Malformed input rejected before reaching the store.
    Validation(ProblemValidationError),
    /// Configured interval pushes the next review past the supported
    /// time range; the record is left unchanged.
    ScheduleOverflow { id: ProblemId, state: ReviewState },
    /// Record store failed or timed out.
    StoreUnavailable(RepoError),
}

impl TrackerError {
    pub(crate) fn from_transition(id: ProblemId, err: TransitionError) -> Self {
        Self::InvalidTransition {
            id,
            current: err.current,
            attempted: err.action,
            required: err.required,
        }
    }

    /// Stable machine-readable code for callers that map errors onward.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Validation(_) => "validation_error",
            Self::ScheduleOverflow { .. } => "schedule_overflow",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no such problem: {id}"),
            Self::InvalidTransition {
                id,
                current,
                attempted,
                required,
            } => write!(
                f,
                "problem {id}: cannot apply `{attempted}` in state `{current}`; requires `{required}`"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::ScheduleOverflow { id, state } => write!(
                f,
                "problem {id}: next review for `{state}` is out of range; shorten the review interval"
            ),
            Self::StoreUnavailable(err) => write!(f, "record store unavailable: {err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProblemValidationError> for TrackerError {
    fn from(value: ProblemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TrackerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::StoreUnavailable(other),
        }
    }
}
