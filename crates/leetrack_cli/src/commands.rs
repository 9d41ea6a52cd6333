//! Command execution against the core services.
//!
//! # Invariants
//! - One connection per invocation; every service borrows it.
//! - Successful results print as pretty JSON on stdout.

use crate::cli::{Cli, Commands, ReviewStage};
use leetrack_core::{
    default_log_level, init_logging, open_db, ConfigError, DbError, LoggingError, Problem,
    ProblemDraft, ProblemId, ProblemQueryService, ProblemRepository, ProblemSearch,
    ProblemService, ReviewScheduler, SqliteProblemRepository, TrackerConfig, TrackerError,
    TrackerResult,
};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure surfaced by the binary.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
    Tracker(TrackerError),
    Output(serde_json::Error),
}

impl CliError {
    /// Stable code printed next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Logging(_) => "logging_error",
            Self::Db(_) => "db_error",
            Self::Tracker(err) => err.code(),
            Self::Output(_) => "output_error",
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "cannot open problem store: {err}"),
            Self::Tracker(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "cannot render output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Tracker(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<TrackerError> for CliError {
    fn from(value: TrackerError) -> Self {
        Self::Tracker(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: ProblemId,
}

/// Loads configuration, starts logging and runs the selected command.
pub fn execute(cli: Cli) -> Result<(), CliError> {
    let config = match cli.config.as_deref() {
        Some(path) => TrackerConfig::from_file(path)?,
        None => TrackerConfig::default(),
    };

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.dir.clone());
    if let Some(dir) = log_dir {
        let level = cli
            .log_level
            .clone()
            .or_else(|| config.logging.level.clone())
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, dir)?;
    }

    let conn = open_db(&cli.db)?;
    let repo = SqliteProblemRepository::try_new(&conn).map_err(TrackerError::from)?;
    let problems = ProblemService::new(repo);
    let scheduler = ReviewScheduler::new(repo, config.review.intervals());
    let queries = ProblemQueryService::new(repo, config.review.day_boundary);

    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Commands::Add {
            title,
            topic,
            difficulty,
            number,
            notes,
            attempted_at,
        } => {
            let draft = ProblemDraft {
                problem_number: number,
                title,
                difficulty,
                topic,
                notes,
                attempted_at,
            };
            print_json(&problems.create_problem(&draft)?)
        }
        Commands::List => print_json(&queries.list_all()?),
        Commands::Due => print_json(&queries.list_due_today()?),
        Commands::Overdue => print_json(&queries.list_overdue()?),
        Commands::Upcoming => print_json(&queries.list_upcoming_reviews()?),
        Commands::Show { id } => print_json(&queries.get_by_id(id)?),
        Commands::Search { query, title_only } => {
            let mut search = ProblemSearch::from_text(&query).map_err(TrackerError::from)?;
            if title_only {
                search = search.title_only();
            }
            print_json(&queries.search(&search)?)
        }
        Commands::Topics => print_json(&queries.list_by_topic()?),
        Commands::Stats => print_json(&queries.compute_statistics()?),
        Commands::TopicStats => print_json(&queries.compute_by_topic()?),
        Commands::Review { stage, id } => print_json(&advance(&scheduler, stage, id)?),
        Commands::Reset { id } => print_json(&scheduler.reset_timer(id)?),
        Commands::Notes { id, text } => print_json(&problems.update_notes(id, text.as_deref())?),
        Commands::Delete { id } => {
            problems.delete_problem(id)?;
            print_json(&Deleted { deleted: id })
        }
    }
}

fn advance<R: ProblemRepository>(
    scheduler: &ReviewScheduler<R>,
    stage: ReviewStage,
    id: ProblemId,
) -> TrackerResult<Problem> {
    match stage {
        ReviewStage::First => scheduler.advance_to_first_review(id),
        ReviewStage::Second => scheduler.advance_to_second_review(id),
        ReviewStage::Master => scheduler.advance_to_mastered(id),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::List => "list",
        Commands::Due => "due",
        Commands::Overdue => "overdue",
        Commands::Upcoming => "upcoming",
        Commands::Show { .. } => "show",
        Commands::Search { .. } => "search",
        Commands::Topics => "topics",
        Commands::Stats => "stats",
        Commands::TopicStats => "topic-stats",
        Commands::Review { .. } => "review",
        Commands::Reset { .. } => "reset",
        Commands::Notes { .. } => "notes",
        Commands::Delete { .. } => "delete",
    }
}

#[cfg(test)]
mod tests {
    use super::{advance, CliError, Deleted};
    use crate::cli::ReviewStage;
    use leetrack_core::{
        open_db_in_memory, ConfigError, ProblemDraft, ProblemService, ReviewIntervals,
        ReviewScheduler, ReviewState, SqliteProblemRepository, TrackerError,
    };

    #[test]
    fn review_stages_advance_in_order() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteProblemRepository::try_new(&conn).unwrap();
        let problem = ProblemService::new(repo)
            .create_problem(&ProblemDraft::new("Two Sum", "Array"))
            .unwrap();
        let scheduler = ReviewScheduler::new(repo, ReviewIntervals::default());

        let err = advance(&scheduler, ReviewStage::Second, problem.id).unwrap_err();
        assert_eq!(err.code(), "invalid_transition");

        let expected = [
            (ReviewStage::First, ReviewState::FirstReviewDone),
            (ReviewStage::Second, ReviewState::SecondReviewDone),
            (ReviewStage::Master, ReviewState::Mastered),
        ];
        for (stage, state) in expected {
            let advanced = advance(&scheduler, stage, problem.id).unwrap();
            assert_eq!(advanced.review_state, state);
        }
    }

    #[test]
    fn deleted_output_carries_the_problem_id() {
        let json = serde_json::to_value(Deleted { deleted: 42 }).unwrap();
        assert_eq!(json, serde_json::json!({ "deleted": 42 }));
    }

    #[test]
    fn error_codes_follow_the_underlying_failure() {
        let err = CliError::from(TrackerError::NotFound(3));
        assert_eq!(err.code(), "not_found");
        assert!(err.to_string().contains('3'));

        let err = CliError::from(ConfigError::Invalid("bad".to_string()));
        assert_eq!(err.code(), "config_error");
    }
}
