//! Statistics over a problem snapshot.

use crate::model::problem::{Difficulty, Problem};
use crate::model::review::ReviewState;
use crate::schedule::DayWindow;
use serde::Serialize;
use std::collections::BTreeMap;

const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Overall statistics for the whole problem set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProblemStats {
    pub total: usize,
    pub unreviewed: usize,
    pub first_review: usize,
    pub second_review: usize,
    pub mastered: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    /// Not mastered, next review inside today's window.
    pub due_today: usize,
    /// Not mastered, next review before today's window.
    pub overdue: usize,
    /// Not mastered with a next review set.
    pub scheduled: usize,
    /// `mastered / total`, `0.0` when there are no problems.
    pub mastery_rate: f64,
    /// Mean days from `now` to the next review, over scheduled problems
    /// that are not overdue.
    pub average_days_until_review: Option<f64>,
}

/// Per-topic breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicStats {
    pub topic: String,
    pub total: usize,
    pub mastered: usize,
    pub due_today: usize,
    pub mastery_rate: f64,
    /// `mastery_rate` as a rounded whole percentage.
    pub mastery_percentage: u32,
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    by_state: [usize; 4],
    by_difficulty: [usize; 3],
    due_today: usize,
    overdue: usize,
    scheduled: usize,
    pending_ms: i128,
    pending_count: usize,
}

impl Tally {
    fn record(&mut self, problem: &Problem, window: DayWindow, now_ms: i64) {
        self.total += 1;
        self.by_state[state_slot(problem.review_state)] += 1;
        self.by_difficulty[difficulty_slot(problem.difficulty)] += 1;

        if problem.review_state.is_mastered() {
            return;
        }
        let Some(next_review_at) = problem.next_review_at else {
            return;
        };

        self.scheduled += 1;
        if window.contains(next_review_at) {
            self.due_today += 1;
        } else if window.starts_after(next_review_at) {
            self.overdue += 1;
            return;
        }
        self.pending_ms += i128::from(next_review_at.saturating_sub(now_ms).max(0));
        self.pending_count += 1;
    }

    fn mastered(&self) -> usize {
        self.by_state[state_slot(ReviewState::Mastered)]
    }

    fn mastery_rate(&self) -> f64 {
        ratio(self.mastered(), self.total)
    }
}

/// Computes overall statistics in a single pass over `problems`.
pub fn compute_statistics(problems: &[Problem], window: DayWindow, now_ms: i64) -> ProblemStats {
    let mut tally = Tally::default();
    for problem in problems {
        tally.record(problem, window, now_ms);
    }

    let average_days_until_review = if tally.pending_count == 0 {
        None
    } else {
        Some(tally.pending_ms as f64 / tally.pending_count as f64 / DAY_MS)
    };

    ProblemStats {
        total: tally.total,
        unreviewed: tally.by_state[state_slot(ReviewState::Unreviewed)],
        first_review: tally.by_state[state_slot(ReviewState::FirstReviewDone)],
        second_review: tally.by_state[state_slot(ReviewState::SecondReviewDone)],
        mastered: tally.mastered(),
        easy: tally.by_difficulty[difficulty_slot(Difficulty::Easy)],
        medium: tally.by_difficulty[difficulty_slot(Difficulty::Medium)],
        hard: tally.by_difficulty[difficulty_slot(Difficulty::Hard)],
        due_today: tally.due_today,
        overdue: tally.overdue,
        scheduled: tally.scheduled,
        mastery_rate: tally.mastery_rate(),
        average_days_until_review,
    }
}

/// Computes per-topic statistics, ordered by topic.
///
/// Topics without problems never appear.
pub fn compute_by_topic(problems: &[Problem], window: DayWindow, now_ms: i64) -> Vec<TopicStats> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for problem in problems {
        tallies
            .entry(problem.topic.as_str())
            .or_default()
            .record(problem, window, now_ms);
    }

    tallies
        .into_iter()
        .map(|(topic, tally)| {
            let mastery_rate = tally.mastery_rate();
            TopicStats {
                topic: topic.to_string(),
                total: tally.total,
                mastered: tally.mastered(),
                due_today: tally.due_today,
                mastery_rate,
                mastery_percentage: (mastery_rate * 100.0).round() as u32,
            }
        })
        .collect()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn state_slot(state: ReviewState) -> usize {
    match state {
        ReviewState::Unreviewed => 0,
        ReviewState::FirstReviewDone => 1,
        ReviewState::SecondReviewDone => 2,
        ReviewState::Mastered => 3,
    }
}

fn difficulty_slot(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
    }
}
