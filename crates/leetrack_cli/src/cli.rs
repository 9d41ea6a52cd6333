//! Command-line surface.
//!
//! # Responsibility
//! - Declare global flags and subcommands.
//! - Parse user-facing values (difficulty, timestamps) into core types.

use chrono::DateTime;
use clap::{Parser, Subcommand, ValueEnum};
use leetrack_core::{Difficulty, ProblemId};
use std::path::PathBuf;

/// Spaced-repetition review tracker for practice problems.
#[derive(Parser, Debug)]
#[command(name = "leetrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite problem store
    #[arg(long, global = true, default_value = "leetrack.sqlite3")]
    pub db: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Absolute directory for rotating log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Track a newly solved problem
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        topic: String,

        /// easy, medium or hard
        #[arg(long, value_parser = parse_difficulty, default_value = "medium")]
        difficulty: Difficulty,

        /// Judge-side problem number
        #[arg(long)]
        number: Option<i64>,

        #[arg(long)]
        notes: Option<String>,

        /// RFC 3339 solve time; defaults to now
        #[arg(long, value_parser = parse_rfc3339_ms)]
        attempted_at: Option<i64>,
    },

    /// List every problem in creation order
    List,

    /// Problems due for review today
    Due,

    /// Problems whose review date has passed
    Overdue,

    /// Every pending review, soonest first
    Upcoming,

    /// Show one problem
    Show { id: ProblemId },

    /// Substring search over titles and topics
    Search {
        query: String,

        /// Match titles only
        #[arg(long)]
        title_only: bool,
    },

    /// Problems grouped by topic
    Topics,

    /// Overall statistics
    Stats,

    /// Per-topic statistics
    TopicStats,

    /// Record a review checkpoint
    Review {
        stage: ReviewStage,
        id: ProblemId,
    },

    /// Send a problem back to the start of the review cycle
    Reset { id: ProblemId },

    /// Replace notes; omit the text to clear them
    Notes { id: ProblemId, text: Option<String> },

    /// Permanently delete a problem
    Delete { id: ProblemId },
}

/// Forward review checkpoints reachable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    First,
    Second,
    Master,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::parse(value)
        .ok_or_else(|| format!("unknown difficulty `{value}`; expected easy|medium|hard"))
}

fn parse_rfc3339_ms(value: &str) -> Result<i64, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.timestamp_millis())
        .map_err(|err| format!("invalid RFC 3339 timestamp `{value}`: {err}"))
}
