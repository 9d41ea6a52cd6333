//! Problem repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide point reads, ordered scans, search and guarded updates over
//!   the `problems` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A review-state update writes state, schedule and audit stamps in one
//!   statement, guarded by the expected predecessor state.
//! - Read paths reject rows whose schedule contradicts their state.
//! - Scans are ordered deterministically (`id` breaks every tie).

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::problem::{
    validate_schedule, Difficulty, Problem, ProblemDraft, ProblemId, ProblemValidationError,
};
use crate::model::review::ReviewState;
use crate::schedule::DayWindow;
use crate::search::ProblemSearch;
use crate::stats::{compute_statistics, ProblemStats};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROBLEM_SELECT_SQL: &str = "SELECT
    id,
    problem_number,
    title,
    difficulty,
    topic,
    notes,
    review_state,
    next_review_at,
    attempted_at,
    first_reviewed_at,
    second_reviewed_at,
    mastered_at,
    created_at,
    updated_at
FROM problems";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "problem_number",
    "title",
    "difficulty",
    "topic",
    "notes",
    "review_state",
    "next_review_at",
    "attempted_at",
    "first_reviewed_at",
    "second_reviewed_at",
    "mastered_at",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for problem persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProblemValidationError),
    Db(DbError),
    NotFound(ProblemId),
    /// Guarded update found the row in a different state.
    StateConflict {
        id: ProblemId,
        expected: ReviewState,
        actual: ReviewState,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "problem not found: {id}"),
            Self::StateConflict {
                id,
                expected,
                actual,
            } => write!(
                f,
                "problem {id} is in state `{actual}`, expected `{expected}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted problem data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProblemValidationError> for RepoError {
    fn from(value: ProblemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One atomic review-state write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStateUpdate {
    pub id: ProblemId,
    /// Guard: the update only applies while the row is in this state.
    /// `None` applies unconditionally.
    pub expected: Option<ReviewState>,
    pub state: ReviewState,
    pub next_review_at: Option<i64>,
    /// Epoch ms recorded as `updated_at` and as the matching audit stamp.
    pub changed_at: i64,
}

/// Problems sharing one topic, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicGroup {
    pub topic: String,
    pub count: usize,
    pub problems: Vec<Problem>,
}

/// Record-store contract consumed by the services.
pub trait ProblemRepository {
    fn insert_problem(&self, draft: &ProblemDraft, created_at: i64) -> RepoResult<ProblemId>;
    fn get_problem(&self, id: ProblemId) -> RepoResult<Option<Problem>>;
    /// All problems in creation order.
    fn list_problems(&self) -> RepoResult<Vec<Problem>>;
    /// Non-mastered problems whose next review falls inside `window`.
    fn list_due_within(&self, window: DayWindow) -> RepoResult<Vec<Problem>>;
    /// Non-mastered problems whose next review is before `before`.
    fn list_overdue(&self, before: i64) -> RepoResult<Vec<Problem>>;
    /// Every pending review, soonest first.
    fn list_upcoming(&self) -> RepoResult<Vec<Problem>>;
    fn search_problems(&self, search: &ProblemSearch) -> RepoResult<Vec<Problem>>;
    /// Problems grouped by exact topic, topics in ascending order.
    fn list_by_topic(&self) -> RepoResult<Vec<TopicGroup>>;
    fn update_review_state(&self, update: &ReviewStateUpdate) -> RepoResult<()>;
    fn update_notes(&self, id: ProblemId, notes: Option<&str>, updated_at: i64)
        -> RepoResult<()>;
    fn delete_problem(&self, id: ProblemId) -> RepoResult<()>;

    /// Aggregates statistics from one scan of the store.
    fn aggregate_stats(&self, window: DayWindow, now_ms: i64) -> RepoResult<ProblemStats> {
        let problems = self.list_problems()?;
        Ok(compute_statistics(&problems, window, now_ms))
    }
}

/// SQLite-backed problem repository.
#[derive(Debug, Clone, Copy)]
pub struct SqliteProblemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProblemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary reads.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_problems<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<Problem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut problems = Vec::new();
        while let Some(row) = rows.next()? {
            problems.push(parse_problem_row(row)?);
        }
        Ok(problems)
    }

    fn current_state(&self, id: ProblemId) -> RepoResult<Option<ReviewState>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT review_state FROM problems WHERE id = ?1;",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        value.map(|text| parse_review_state(&text)).transpose()
    }
}

impl ProblemRepository for SqliteProblemRepository<'_> {
    fn insert_problem(&self, draft: &ProblemDraft, created_at: i64) -> RepoResult<ProblemId> {
        let draft = draft.normalized()?;

        self.conn.execute(
            "INSERT INTO problems (
                problem_number,
                title,
                difficulty,
                topic,
                notes,
                review_state,
                next_review_at,
                attempted_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, ?8);",
            params![
                draft.problem_number,
                draft.title.as_str(),
                draft.difficulty.to_db(),
                draft.topic.as_str(),
                draft.notes.as_deref(),
                ReviewState::Unreviewed.as_str(),
                draft.attempted_at.unwrap_or(created_at),
                created_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_problem(&self, id: ProblemId) -> RepoResult<Option<Problem>> {
        let mut problems =
            self.query_problems(&format!("{PROBLEM_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(problems.pop())
    }

    fn list_problems(&self) -> RepoResult<Vec<Problem>> {
        self.query_problems(&format!("{PROBLEM_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn list_due_within(&self, window: DayWindow) -> RepoResult<Vec<Problem>> {
        self.query_problems(
            &format!(
                "{PROBLEM_SELECT_SQL}
                 WHERE review_state != 'mastered'
                   AND next_review_at IS NOT NULL
                   AND next_review_at >= ?1
                   AND next_review_at < ?2
                 ORDER BY next_review_at ASC, id ASC;"
            ),
            params![window.start, window.end],
        )
    }

    fn list_overdue(&self, before: i64) -> RepoResult<Vec<Problem>> {
        self.query_problems(
            &format!(
                "{PROBLEM_SELECT_SQL}
                 WHERE review_state != 'mastered'
                   AND next_review_at IS NOT NULL
                   AND next_review_at < ?1
                 ORDER BY next_review_at ASC, id ASC;"
            ),
            [before],
        )
    }

    fn list_upcoming(&self) -> RepoResult<Vec<Problem>> {
        self.query_problems(
            &format!(
                "{PROBLEM_SELECT_SQL}
                 WHERE review_state != 'mastered'
                   AND next_review_at IS NOT NULL
                 ORDER BY next_review_at ASC, id ASC;"
            ),
            [],
        )
    }

    fn search_problems(&self, search: &ProblemSearch) -> RepoResult<Vec<Problem>> {
        search.validate()?;
        self.query_problems(
            &format!(
                "{PROBLEM_SELECT_SQL}
                 WHERE title LIKE ?1 ESCAPE '\\'
                    OR (?2 IS NOT NULL AND topic LIKE ?2 ESCAPE '\\')
                 ORDER BY id ASC;"
            ),
            params![search.title_pattern(), search.topic_pattern()],
        )
    }

    fn list_by_topic(&self) -> RepoResult<Vec<TopicGroup>> {
        let problems =
            self.query_problems(&format!("{PROBLEM_SELECT_SQL} ORDER BY topic ASC, id ASC;"), [])?;

        let mut groups: Vec<TopicGroup> = Vec::new();
        for problem in problems {
            match groups.last_mut() {
                Some(group) if group.topic == problem.topic => {
                    group.count += 1;
                    group.problems.push(problem);
                }
                _ => groups.push(TopicGroup {
                    topic: problem.topic.clone(),
                    count: 1,
                    problems: vec![problem],
                }),
            }
        }
        Ok(groups)
    }

    fn update_review_state(&self, update: &ReviewStateUpdate) -> RepoResult<()> {
        validate_schedule(update.state, update.next_review_at)?;

        let changed = self.conn.execute(
            "UPDATE problems
             SET
                review_state = ?2,
                next_review_at = ?3,
                first_reviewed_at = CASE ?2
                    WHEN 'first_review_done' THEN ?4
                    WHEN 'unreviewed' THEN NULL
                    ELSE first_reviewed_at END,
                second_reviewed_at = CASE ?2
                    WHEN 'second_review_done' THEN ?4
                    WHEN 'unreviewed' THEN NULL
                    ELSE second_reviewed_at END,
                mastered_at = CASE ?2
                    WHEN 'mastered' THEN ?4
                    WHEN 'unreviewed' THEN NULL
                    ELSE mastered_at END,
                updated_at = ?4
             WHERE id = ?1
               AND (?5 IS NULL OR review_state = ?5);",
            params![
                update.id,
                update.state.as_str(),
                update.next_review_at,
                update.changed_at,
                update.expected.map(ReviewState::as_str),
            ],
        )?;

        if changed > 0 {
            return Ok(());
        }

        match (self.current_state(update.id)?, update.expected) {
            (Some(actual), Some(expected)) => Err(RepoError::StateConflict {
                id: update.id,
                expected,
                actual,
            }),
            _ => Err(RepoError::NotFound(update.id)),
        }
    }

    fn update_notes(
        &self,
        id: ProblemId,
        notes: Option<&str>,
        updated_at: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE problems
             SET
                notes = ?2,
                updated_at = ?3
             WHERE id = ?1;",
            params![id, notes, updated_at],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_problem(&self, id: ProblemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM problems WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_problem_row(row: &Row<'_>) -> RepoResult<Problem> {
    let difficulty_value: i64 = row.get("difficulty")?;
    let difficulty = Difficulty::from_db(difficulty_value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty_value}` in problems.difficulty"
        ))
    })?;

    let state_text: String = row.get("review_state")?;
    let review_state = parse_review_state(&state_text)?;

    let problem = Problem {
        id: row.get("id")?,
        problem_number: row.get("problem_number")?,
        title: row.get("title")?,
        difficulty,
        topic: row.get("topic")?,
        notes: row.get("notes")?,
        review_state,
        next_review_at: row.get("next_review_at")?,
        attempted_at: row.get("attempted_at")?,
        first_reviewed_at: row.get("first_reviewed_at")?,
        second_reviewed_at: row.get("second_reviewed_at")?,
        mastered_at: row.get("mastered_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    problem.validate().map_err(|err| {
        RepoError::InvalidData(format!("problem {} failed validation: {err}", problem.id))
    })?;
    Ok(problem)
}

fn parse_review_state(value: &str) -> RepoResult<ReviewState> {
    ReviewState::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid review state `{value}` in problems.review_state"
        ))
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "problems")? {
        return Err(RepoError::MissingRequiredTable("problems"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "problems", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "problems",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
