//! Problem domain model.
//!
//! # Responsibility
//! - Define the canonical tracked-problem record and its creation draft.
//! - Normalize and validate user-supplied text before persistence.
//!
//! # Invariants
//! - `id` and `created_at` never change after insert.
//! - `title` and `topic` are non-empty after normalization.
//! - `next_review_at` is `None` for `Mastered`, and `Some` for the two
//!   in-between review states.

use crate::model::review::ReviewState;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Store-assigned problem identifier.
pub type ProblemId = i64;

/// Judge difficulty label. Persisted as `1..=3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn to_db(self) -> i64 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub fn from_db(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Parses a case-insensitive label (`easy|medium|hard`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Validation failures for problem input and persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemValidationError {
    EmptyTitle,
    EmptyTopic,
    InvalidProblemNumber(i64),
    /// Search pattern is empty or not `%`-wrapped.
    InvalidSearchPattern(String),
    /// Stored schedule contradicts the review state.
    ScheduleMismatch {
        state: ReviewState,
        next_review_at: Option<i64>,
    },
}

impl Display for ProblemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::EmptyTopic => write!(f, "topic must not be blank"),
            Self::InvalidProblemNumber(value) => {
                write!(f, "problem number must be positive, got {value}")
            }
            Self::InvalidSearchPattern(pattern) => write!(
                f,
                "search pattern `{pattern}` must be non-empty and wrapped in `%`"
            ),
            Self::ScheduleMismatch {
                state,
                next_review_at,
            } => match next_review_at {
                Some(at) => write!(f, "state `{state}` must not carry next review at {at}"),
                None => write!(f, "state `{state}` requires a next review timestamp"),
            },
        }
    }
}

impl Error for ProblemValidationError {}

/// Canonical tracked-problem record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    /// Judge-side problem number, when known.
    pub problem_number: Option<i64>,
    pub title: String,
    pub difficulty: Difficulty,
    /// Categorical tag used for grouping and search.
    pub topic: String,
    pub notes: Option<String>,
    pub review_state: ReviewState,
    /// Unix epoch milliseconds.
    pub next_review_at: Option<i64>,
    /// Unix epoch milliseconds of the original solve.
    pub attempted_at: i64,
    pub first_reviewed_at: Option<i64>,
    pub second_reviewed_at: Option<i64>,
    pub mastered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Problem {
    /// Checks record-level invariants.
    ///
    /// Used on both write and read paths so corrupt rows are reported
    /// instead of masked.
    pub fn validate(&self) -> Result<(), ProblemValidationError> {
        if self.title.trim().is_empty() {
            return Err(ProblemValidationError::EmptyTitle);
        }
        if self.topic.trim().is_empty() {
            return Err(ProblemValidationError::EmptyTopic);
        }
        validate_problem_number(self.problem_number)?;
        validate_schedule(self.review_state, self.next_review_at)
    }

    /// Returns whether a review is still pending for this problem.
    pub fn is_scheduled(&self) -> bool {
        !self.review_state.is_mastered() && self.next_review_at.is_some()
    }
}

/// Creation input for a new problem.
///
/// Store-owned fields (`id`, review state, timestamps) are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDraft {
    pub problem_number: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub topic: String,
    pub notes: Option<String>,
    /// Defaults to creation time when omitted.
    pub attempted_at: Option<i64>,
}

impl ProblemDraft {
    pub fn new(title: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_problem_number(mut self, number: i64) -> Self {
        self.problem_number = Some(number);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_attempted_at(mut self, epoch_ms: i64) -> Self {
        self.attempted_at = Some(epoch_ms);
        self
    }

    /// Returns a copy with normalized text fields, or the first
    /// validation failure.
    pub fn normalized(&self) -> Result<ProblemDraft, ProblemValidationError> {
        let title = normalize_label(&self.title);
        if title.is_empty() {
            return Err(ProblemValidationError::EmptyTitle);
        }
        let topic = normalize_label(&self.topic);
        if topic.is_empty() {
            return Err(ProblemValidationError::EmptyTopic);
        }
        validate_problem_number(self.problem_number)?;

        Ok(ProblemDraft {
            problem_number: self.problem_number,
            title,
            difficulty: self.difficulty,
            topic,
            notes: normalize_notes(self.notes.as_deref()),
            attempted_at: self.attempted_at,
        })
    }
}

/// Trims and collapses inner whitespace runs to one space.
pub fn normalize_label(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

/// Maps blank notes to `None`; keeps non-blank notes verbatim.
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn validate_problem_number(number: Option<i64>) -> Result<(), ProblemValidationError> {
    match number {
        Some(value) if value <= 0 => Err(ProblemValidationError::InvalidProblemNumber(value)),
        _ => Ok(()),
    }
}

/// Checks that `next_review_at` agrees with `state`.
pub fn validate_schedule(
    state: ReviewState,
    next_review_at: Option<i64>,
) -> Result<(), ProblemValidationError> {
    let consistent = if state.is_mastered() {
        next_review_at.is_none()
    } else {
        !state.requires_schedule() || next_review_at.is_some()
    };
    if consistent {
        Ok(())
    } else {
        Err(ProblemValidationError::ScheduleMismatch {
            state,
            next_review_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_label, validate_schedule, ProblemDraft, ProblemValidationError};
    use crate::model::review::ReviewState;

    #[test]
    fn normalize_label_collapses_whitespace() {
        assert_eq!(normalize_label("  Two \t  Sum \n"), "Two Sum");
    }

    #[test]
    fn draft_rejects_blank_title_and_topic() {
        let err = ProblemDraft::new("   ", "Array").normalized().unwrap_err();
        assert_eq!(err, ProblemValidationError::EmptyTitle);

        let err = ProblemDraft::new("Two Sum", "\t").normalized().unwrap_err();
        assert_eq!(err, ProblemValidationError::EmptyTopic);
    }

    #[test]
    fn draft_rejects_non_positive_problem_number() {
        let err = ProblemDraft::new("Two Sum", "Array")
            .with_problem_number(0)
            .normalized()
            .unwrap_err();
        assert_eq!(err, ProblemValidationError::InvalidProblemNumber(0));
    }

    #[test]
    fn draft_drops_blank_notes() {
        let draft = ProblemDraft::new("Two Sum", "Array")
            .with_notes("  ")
            .normalized()
            .unwrap();
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn schedule_must_match_state() {
        assert!(validate_schedule(ReviewState::Unreviewed, None).is_ok());
        assert!(validate_schedule(ReviewState::Unreviewed, Some(1)).is_ok());
        assert!(validate_schedule(ReviewState::FirstReviewDone, None).is_err());
        assert!(validate_schedule(ReviewState::SecondReviewDone, Some(1)).is_ok());
        assert!(validate_schedule(ReviewState::Mastered, Some(1)).is_err());
        assert!(validate_schedule(ReviewState::Mastered, None).is_ok());
    }
}
