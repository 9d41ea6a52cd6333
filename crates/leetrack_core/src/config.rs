//! Tracker configuration.
//!
//! # Responsibility
//! - Hold tunable review intervals and the day-boundary rule.
//! - Load settings from `.toml` or `.json` files.
//!
//! # Invariants
//! - Intervals are between one day and `MAX_INTERVAL_DAYS`.
//! - Fixed UTC offsets stay within ±14 hours.
//! - Missing keys fall back to defaults.

use crate::schedule::window::MAX_UTC_OFFSET_MINUTES;
use crate::schedule::{
    DayBoundary, ReviewIntervals, DEFAULT_FIRST_INTERVAL_DAYS, DEFAULT_SECOND_INTERVAL_DAYS,
    MAX_INTERVAL_DAYS,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
    UnsupportedFormat(PathBuf),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                message,
            } => write!(f, "failed to parse config `{}`: {message}", path.display()),
            Self::Parse {
                path: None,
                message,
            } => write!(f, "failed to parse config: {message}"),
            Self::UnsupportedFormat(path) => write!(
                f,
                "unsupported config format `{}`; use .toml or .json",
                path.display()
            ),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Review-scheduling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Days until the next review after the first review or a reset.
    pub first_interval_days: u32,
    /// Days until the next review after the second review.
    pub second_interval_days: u32,
    pub day_boundary: DayBoundary,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            first_interval_days: DEFAULT_FIRST_INTERVAL_DAYS,
            second_interval_days: DEFAULT_SECOND_INTERVAL_DAYS,
            day_boundary: DayBoundary::default(),
        }
    }
}

impl ReviewConfig {
    pub fn intervals(&self) -> ReviewIntervals {
        ReviewIntervals::from_days(self.first_interval_days, self.second_interval_days)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_interval("review.first_interval_days", self.first_interval_days)?;
        check_interval("review.second_interval_days", self.second_interval_days)?;
        if let DayBoundary::Fixed { utc_offset_minutes } = self.day_boundary {
            if utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
                return Err(ConfigError::Invalid(format!(
                    "review.day_boundary.utc_offset_minutes must be within ±{MAX_UTC_OFFSET_MINUTES}, got {utc_offset_minutes}"
                )));
            }
        }
        Ok(())
    }
}

fn check_interval(key: &str, days: u32) -> Result<(), ConfigError> {
    if (1..=MAX_INTERVAL_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{key} must be between 1 and {MAX_INTERVAL_DAYS}, got {days}"
        )))
    }
}

/// Logging settings consumed by the binary at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub level: Option<String>,
    /// Absolute log directory; file logging is skipped when unset.
    pub dir: Option<PathBuf>,
}

/// Top-level tracker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub review: ReviewConfig,
    pub logging: LoggingConfig,
}

impl TrackerConfig {
    /// Loads and validates configuration from a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str::<Self>(&content).map_err(|err| err.to_string()),
            Some("json") => serde_json::from_str::<Self>(&content).map_err(|err| err.to_string()),
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        let config = parsed.map_err(|message| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: None,
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.review.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TrackerConfig};
    use crate::schedule::DayBoundary;

    #[test]
    fn empty_document_uses_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.review.first_interval_days, 7);
        assert_eq!(config.review.second_interval_days, 20);
        assert_eq!(config.review.day_boundary, DayBoundary::Local);
    }

    #[test]
    fn parses_review_section() {
        let config = TrackerConfig::from_toml_str(
            r#"
            [review]
            first_interval_days = 3
            second_interval_days = 14
            day_boundary = { mode = "fixed", utc_offset_minutes = -300 }

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.review.first_interval_days, 3);
        assert_eq!(config.review.second_interval_days, 14);
        assert_eq!(
            config.review.day_boundary,
            DayBoundary::Fixed {
                utc_offset_minutes: -300
            }
        );
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = TrackerConfig::from_toml_str("[review]\nfirst_interval_days = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_interval_beyond_a_century() {
        let err = TrackerConfig::from_toml_str("[review]\nfirst_interval_days = 4000000000\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("first_interval_days"));

        let config =
            TrackerConfig::from_toml_str("[review]\nsecond_interval_days = 36500\n").unwrap();
        assert_eq!(config.review.second_interval_days, 36_500);
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let err = TrackerConfig::from_toml_str(
            "[review]\nday_boundary = { mode = \"fixed\", utc_offset_minutes = 900 }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("utc_offset_minutes"));
    }

    #[test]
    fn reports_parse_errors() {
        let err = TrackerConfig::from_toml_str("[review\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }
}
