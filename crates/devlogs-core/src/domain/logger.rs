//! Logger names and the slugs derived from them

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref SLUG_SEPARATORS: Regex = Regex::new(r"[^a-z0-9]+").expect("valid slug regex");
}

/// Prefix joined to every logger name before slugging
const SLUG_PREFIX: &str = "logger_";

/// Prefix of every log record title
const TITLE_PREFIX: &str = "Logger: ";

/// Name of a logical log stream (e.g. a subsystem name).
///
/// Each logger maps to exactly one durable log record, found through
/// [`LoggerName::slug`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoggerName(String);

impl LoggerName {
    /// Create a logger name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as given by the caller
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable lookup key of this logger's record.
    ///
    /// `logger_<name>` lowercased, runs of anything outside `[a-z0-9]`
    /// collapsed into one hyphen, hyphens trimmed from both ends.
    pub fn slug(&self) -> String {
        slugify(&format!("{}{}", SLUG_PREFIX, self.0))
    }

    /// Title given to this logger's record on creation
    pub fn record_title(&self) -> String {
        format!("{}{}", TITLE_PREFIX, self.0)
    }
}

/// Normalize arbitrary text into a lowercase, hyphen-separated slug
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    SLUG_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

impl fmt::Display for LoggerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LoggerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LoggerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LoggerName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for LoggerName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LoggerName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
