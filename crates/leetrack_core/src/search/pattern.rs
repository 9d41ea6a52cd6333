//! `LIKE`-pattern search over problem titles and topics.
//!
//! # Invariants
//! - The title pattern is never empty and is wrapped in unescaped `%`.
//! - An empty topic pattern means "no topic filter".
//! - Patterns built from free text escape `%`, `_` and `\` with `\`.

use crate::model::problem::ProblemValidationError;

/// Escape character used in every generated `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Title/topic search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSearch {
    title_pattern: String,
    topic_pattern: Option<String>,
}

impl ProblemSearch {
    /// Builds a search from explicit `LIKE` patterns.
    ///
    /// # Errors
    /// - `InvalidSearchPattern` when `title_pattern` is empty or not
    ///   wrapped in `%`, including a closing `%` escaped as `\%`.
    pub fn from_patterns(
        title_pattern: impl Into<String>,
        topic_pattern: Option<String>,
    ) -> Result<Self, ProblemValidationError> {
        let search = Self {
            title_pattern: title_pattern.into(),
            topic_pattern: topic_pattern.filter(|pattern| !pattern.is_empty()),
        };
        search.validate()?;
        Ok(search)
    }

    /// Builds a case-insensitive substring search for `text` over both
    /// title and topic.
    ///
    /// # Errors
    /// - `InvalidSearchPattern` when `text` is blank.
    pub fn from_text(text: &str) -> Result<Self, ProblemValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProblemValidationError::InvalidSearchPattern(
                text.to_string(),
            ));
        }
        let pattern = wrap_substring(trimmed);
        Ok(Self {
            title_pattern: pattern.clone(),
            topic_pattern: Some(pattern),
        })
    }

    /// Restricts the search to titles only.
    pub fn title_only(mut self) -> Self {
        self.topic_pattern = None;
        self
    }

    pub fn title_pattern(&self) -> &str {
        &self.title_pattern
    }

    pub fn topic_pattern(&self) -> Option<&str> {
        self.topic_pattern.as_deref()
    }

    pub fn validate(&self) -> Result<(), ProblemValidationError> {
        let pattern = self.title_pattern.as_str();
        let wrapped = pattern.len() >= 2 && pattern.starts_with('%') && pattern.ends_with('%');
        if !wrapped || pattern.trim_matches('%').is_empty() || escapes_last_char(pattern) {
            return Err(ProblemValidationError::InvalidSearchPattern(
                pattern.to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns whether the final character is preceded by an odd run of
/// [`LIKE_ESCAPE`].
fn escapes_last_char(pattern: &str) -> bool {
    let mut chars = pattern.chars().rev();
    chars.next();
    chars.take_while(|&ch| ch == LIKE_ESCAPE).count() % 2 == 1
}

/// Wraps `text` as `%text%` after escaping `LIKE` metacharacters.
pub fn wrap_substring(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
