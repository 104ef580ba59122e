//! Query-match highlighting.
//!
//! Wraps every case-insensitive occurrence of the literal query in
//! [`MARK_OPEN`] / [`MARK_CLOSE`]. Regex metacharacters in the query are
//! escaped, so `"F1 (early)"` matches the text `f1 (EARLY)` and nothing else.
//!
//! [`QueryPattern`] is also what scoring and the search text filter match
//! with, so a field counts as a hit exactly when it gets a marked span.

use regex::{Captures, Regex, RegexBuilder};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// A free-text query compiled once for case-insensitive literal matching.
///
/// A blank query matches nothing.
#[derive(Debug, Clone)]
pub struct QueryPattern {
    regex: Option<Regex>,
}

impl QueryPattern {
    pub fn new(query: &str) -> Self {
        if query.trim().is_empty() {
            return Self { regex: None };
        }
        let regex = match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(query, error = %e, "could not build query pattern");
                None
            }
        };
        Self { regex }
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Whether `text` contains the query anywhere.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Whether the whole of `text` is the query.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex
            .as_ref()
            .and_then(|re| re.find(text))
            .is_some_and(|m| m.start() == 0 && m.end() == text.len())
    }

    /// Annotate `text` with highlight markers around each match.
    pub fn highlight(&self, text: &str) -> String {
        match &self.regex {
            Some(re) => re
                .replace_all(text, |caps: &Captures| {
                    format!("{}{}{}", MARK_OPEN, &caps[0], MARK_CLOSE)
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Annotate `text` with highlight markers around each match of `query`.
///
/// Text outside the matches is returned byte-identical, and matched
/// spans keep their original casing.
pub fn highlight(text: &str, query: &str) -> String {
    QueryPattern::new(query).highlight(text)
}
