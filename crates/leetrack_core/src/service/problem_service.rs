//! Problem lifecycle use-case service.
//!
//! # Responsibility
//! - Create, annotate and delete tracked problems.
//!
//! # Invariants
//! - New problems start `Unreviewed` with no schedule.
//! - Notes updates never touch review state or schedule.
//! - Deletion is a hard delete.

use crate::model::problem::{normalize_notes, Problem, ProblemDraft, ProblemId};
use crate::repo::problem_repo::ProblemRepository;
use crate::service::error::{TrackerError, TrackerResult};
use chrono::{DateTime, Utc};
use log::info;

/// Use-case service for problem create/notes/delete.
pub struct ProblemService<R: ProblemRepository> {
    repo: R,
}

impl<R: ProblemRepository> ProblemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a problem and returns the stored record.
    pub fn create_problem(&self, draft: &ProblemDraft) -> TrackerResult<Problem> {
        self.create_problem_at(draft, Utc::now())
    }

    /// Creates a problem with `now` as its creation time.
    ///
    /// # Errors
    /// - `Validation` for blank title/topic or a non-positive problem number.
    pub fn create_problem_at(
        &self,
        draft: &ProblemDraft,
        now: DateTime<Utc>,
    ) -> TrackerResult<Problem> {
        let draft = draft.normalized()?;
        let id = self.repo.insert_problem(&draft, now.timestamp_millis())?;
        info!("event=problem_create module=service status=ok problem_id={id}");

        self.repo
            .get_problem(id)?
            .ok_or(TrackerError::NotFound(id))
    }

    /// Replaces notes; blank notes clear the field.
    pub fn update_notes(&self, id: ProblemId, notes: Option<&str>) -> TrackerResult<Problem> {
        let notes = normalize_notes(notes);
        self.repo
            .update_notes(id, notes.as_deref(), Utc::now().timestamp_millis())?;
        info!(
            "event=problem_notes module=service status=ok problem_id={id} cleared={}",
            notes.is_none()
        );

        self.repo
            .get_problem(id)?
            .ok_or(TrackerError::NotFound(id))
    }

    pub fn delete_problem(&self, id: ProblemId) -> TrackerResult<()> {
        self.repo.delete_problem(id)?;
        info!("event=problem_delete module=service status=ok problem_id={id}");
        Ok(())
    }
}
