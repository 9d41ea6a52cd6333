//! Problem query use-case service.
//!
//! # Responsibility
//! - Expose typed read operations over the problem store.
//! - Resolve "today" from the configured day boundary.
//! - Feed store snapshots to the aggregation engine.
//!
//! # Invariants
//! - No operation here mutates state.
//! - Each statistics call works on a single store scan.

use crate::model::problem::{Problem, ProblemId};
use crate::repo::problem_repo::{ProblemRepository, TopicGroup};
use crate::schedule::{DayBoundary, DayWindow};
use crate::search::ProblemSearch;
use crate::service::error::{TrackerError, TrackerResult};
use crate::stats::{compute_by_topic, ProblemStats, TopicStats};
use chrono::{DateTime, Utc};
use log::debug;

/// Read-only projections over the problem store.
pub struct ProblemQueryService<R: ProblemRepository> {
    repo: R,
    day_boundary: DayBoundary,
}

impl<R: ProblemRepository> ProblemQueryService<R> {
    pub fn new(repo: R, day_boundary: DayBoundary) -> Self {
        Self { repo, day_boundary }
    }

    /// Today's window as of `now`.
    pub fn today_at(&self, now: DateTime<Utc>) -> DayWindow {
        DayWindow::resolve(self.day_boundary, now)
    }

    /// All problems in creation order.
    pub fn list_all(&self) -> TrackerResult<Vec<Problem>> {
        Ok(self.repo.list_problems()?)
    }

    pub fn list_due_today(&self) -> TrackerResult<Vec<Problem>> {
        self.list_due_today_at(Utc::now())
    }

    /// Non-mastered problems whose next review falls in today's window,
    /// soonest first.
    pub fn list_due_today_at(&self, now: DateTime<Utc>) -> TrackerResult<Vec<Problem>> {
        let window = self.today_at(now);
        let problems = self.repo.list_due_within(window)?;
        debug!(
            "event=list_due module=query status=ok window_start={} window_end={} count={}",
            window.start,
            window.end,
            problems.len()
        );
        Ok(problems)
    }

    pub fn list_overdue(&self) -> TrackerResult<Vec<Problem>> {
        self.list_overdue_at(Utc::now())
    }

    /// Non-mastered problems whose review should have happened before today.
    pub fn list_overdue_at(&self, now: DateTime<Utc>) -> TrackerResult<Vec<Problem>> {
        Ok(self.repo.list_overdue(self.today_at(now).start)?)
    }

    /// Every pending review, soonest first.
    pub fn list_upcoming_reviews(&self) -> TrackerResult<Vec<Problem>> {
        Ok(self.repo.list_upcoming()?)
    }

    pub fn get_by_id(&self, id: ProblemId) -> TrackerResult<Problem> {
        self.repo
            .get_problem(id)?
            .ok_or(TrackerError::NotFound(id))
    }

    /// Case-insensitive substring search over title, then topic.
    ///
    /// Case folding follows SQLite `LIKE` and only covers ASCII letters;
    /// `"ärger"` does not match `"Ärger"`.
    ///
    /// # Errors
    /// - `Validation` when `query` is blank.
    pub fn search_by_text(&self, query: &str) -> TrackerResult<Vec<Problem>> {
        let search = ProblemSearch::from_text(query)?;
        self.search(&search)
    }

    /// Searches with caller-built `LIKE` patterns.
    pub fn search(&self, search: &ProblemSearch) -> TrackerResult<Vec<Problem>> {
        search.validate()?;
        let problems = self.repo.search_problems(search)?;
        debug!(
            "event=search module=query status=ok topic_filter={} count={}",
            search.topic_pattern().is_some(),
            problems.len()
        );
        Ok(problems)
    }

    /// Problems grouped by topic with per-topic counts.
    pub fn list_by_topic(&self) -> TrackerResult<Vec<TopicGroup>> {
        Ok(self.repo.list_by_topic()?)
    }

    pub fn compute_statistics(&self) -> TrackerResult<ProblemStats> {
        self.compute_statistics_at(Utc::now())
    }

    pub fn compute_statistics_at(&self, now: DateTime<Utc>) -> TrackerResult<ProblemStats> {
        Ok(self
            .repo
            .aggregate_stats(self.today_at(now), now.timestamp_millis())?)
    }

    pub fn compute_by_topic(&self) -> TrackerResult<Vec<TopicStats>> {
        self.compute_by_topic_at(Utc::now())
    }

    pub fn compute_by_topic_at(&self, now: DateTime<Utc>) -> TrackerResult<Vec<TopicStats>> {
        let problems = self.repo.list_problems()?;
        Ok(compute_by_topic(
            &problems,
            self.today_at(now),
            now.timestamp_millis(),
        ))
    }
}
