//! Log record entity - the durable body of one logger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LoggerName;

/// Record type namespace of every logger record
pub const LOG_RECORD_TYPE: &str = "devlogs";

/// Durable log of one logger.
///
/// Created lazily on the first flush for a logger and never deleted by the
/// flush path. At most one record exists per `(record_type, slug)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Opaque identity
    pub id: Uuid,

    /// Namespace the slug is unique within
    pub record_type: String,

    /// `Logger: <name>`
    pub title: String,

    /// Lookup key derived from the logger name
    pub slug: String,

    /// Newline-joined log text
    pub body: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last body write
    pub updated_at: DateTime<Utc>,
}

impl LogRecord {
    /// New, empty record for a logger
    pub fn for_logger(logger: &LoggerName) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            record_type: LOG_RECORD_TYPE.to_string(),
            title: logger.record_title(),
            slug: logger.slug(),
            body: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the record holds any text
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Number of lines in the body (multi-line payload dumps count per line)
    pub fn line_count(&self) -> usize {
        if self.body.is_empty() {
            0
        } else {
            self.body.lines().count()
        }
    }

    /// File name offered when the body is downloaded
    pub fn download_filename(&self) -> String {
        format!("{}.log", self.slug)
    }
}
