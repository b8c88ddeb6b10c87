//! Request ids and formatted log lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp layout of every log line (sortable, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of a request id in hex characters
pub const REQUEST_ID_LEN: usize = 6;

/// Short fingerprint grouping the lines of one unit of work.
///
/// Not globally unique; only used to tell requests apart when reading a log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Build from the hex digest of the request snapshot (truncated to 6 chars)
    pub fn from_digest(hex: &str) -> Self {
        Self(hex.chars().take(REQUEST_ID_LEN).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One formatted line: `[<timestamp> <request id>] <message>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLine(String);

impl LogLine {
    /// Format a message written at `at` during request `request_id`
    pub fn format(at: DateTime<Utc>, request_id: &RequestId, message: &str) -> Self {
        Self(format!(
            "[{} {}] {}",
            at.format(TIMESTAMP_FORMAT),
            request_id,
            message
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
