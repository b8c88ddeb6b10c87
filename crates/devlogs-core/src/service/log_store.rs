//! Log store - resolves loggers to records and appends to record bodies

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{LogLine, LogRecord, LoggerName, LOG_RECORD_TYPE};
use crate::error::{DevLogError, Result};
use crate::repository::LogRecordRepository;

/// Sole writer of record bodies on the flush path
#[derive(Clone)]
pub struct LogStore {
    repository: Arc<dyn LogRecordRepository>,
}

impl LogStore {
    pub fn new(repository: Arc<dyn LogRecordRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn LogRecordRepository> {
        &self.repository
    }

    /// Resolve the record of `logger`, creating an empty one on first use.
    ///
    /// Creation goes through the repository's insert-if-absent, so two
    /// first writers end up sharing one record when the backend enforces
    /// slug uniqueness.
    pub async fn get_or_create_record(&self, logger: &LoggerName) -> Result<LogRecord> {
        let slug = logger.slug();

        let existing = self
            .repository
            .find_by_slug(&slug, LOG_RECORD_TYPE)
            .await
            .map_err(|e| DevLogError::lookup(logger.as_str(), e))?;
        if let Some(record) = existing {
            debug!("[LogStore] Found record {} for logger '{}'", slug, logger);
            return Ok(record);
        }

        let candidate = LogRecord::for_logger(logger);
        let record = self
            .repository
            .insert_if_absent(&candidate)
            .await
            .map_err(|e| DevLogError::lookup(logger.as_str(), e))?;
        if record.id == candidate.id {
            info!("[LogStore] Created record {} for logger '{}'", slug, logger);
        } else {
            // A concurrent writer inserted it after our lookup
            debug!("[LogStore] Resolved concurrent record {} for logger '{}'", slug, logger);
        }
        Ok(record)
    }

    /// Append `lines` to the record body and return the updated record.
    ///
    /// Read-modify-write: the body is re-read from storage, extended and
    /// written back whole. Concurrent writers to the same record are
    /// last-writer-wins.
    pub async fn append_body(&self, record: &LogRecord, lines: &[LogLine]) -> Result<LogRecord> {
        if lines.is_empty() {
            return Ok(record.clone());
        }

        let mut current = self
            .repository
            .get(&record.id)
            .await
            .map_err(|e| DevLogError::write(&record.slug, e))?
            .ok_or_else(|| DevLogError::RecordNotFound(record.slug.clone()))?;

        let body = append_lines(&current.body, lines);
        self.repository
            .update_body(&current.id, &body)
            .await
            .map_err(|e| DevLogError::write(&record.slug, e))?;

        debug!(
            "[LogStore] Appended {} lines to {}",
            lines.len(),
            current.slug
        );
        current.body = body;
        Ok(current)
    }
}

/// `previous` + `\n` + lines joined by `\n`. The separator is skipped when
/// `previous` is empty so a fresh record starts with its first line.
pub fn append_lines(previous: &str, lines: &[LogLine]) -> String {
    let joined = lines
        .iter()
        .map(LogLine::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if previous.is_empty() {
        joined
    } else {
        format!("{}\n{}", previous, joined)
    }
}
