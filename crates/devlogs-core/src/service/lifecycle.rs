//! Lifecycle flusher - persists a unit of work's buffer at its end

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::log_buffer::LogBufferEntry;
use super::log_store::LogStore;
use crate::domain::LoggerName;
use crate::error::DevLogError;

/// Flush state of one unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushState {
    /// Nothing buffered, no flush scheduled
    Idle,
    /// Lines buffered, flush scheduled for end of lifecycle
    Armed,
    /// End of lifecycle reached and buffer drained
    Flushed,
}

/// One logger whose lines reached storage
#[derive(Debug, Clone, Serialize)]
pub struct PersistedLogger {
    pub logger: LoggerName,
    pub record_id: Uuid,
    pub slug: String,
    pub lines: usize,
}

/// One logger whose lines were lost
#[derive(Debug)]
pub struct FlushFailure {
    pub logger: LoggerName,
    pub lines: usize,
    pub error: DevLogError,
}

/// Outcome of one flush, per logger
#[derive(Debug, Default)]
pub struct FlushReport {
    pub persisted: Vec<PersistedLogger>,
    pub failures: Vec<FlushFailure>,
}

impl FlushReport {
    /// Whether the flush wrote nothing and failed nothing
    pub fn is_empty(&self) -> bool {
        self.persisted.is_empty() && self.failures.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Lines written across all loggers
    pub fn lines_written(&self) -> usize {
        self.persisted.iter().map(|p| p.lines).sum()
    }
}

/// Writes drained buffers through the [`LogStore`]
#[derive(Clone)]
pub struct LifecycleFlusher {
    store: LogStore,
}

impl LifecycleFlusher {
    pub fn new(store: LogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Persist every entry: get-or-create the logger's record, then append.
    ///
    /// Failures are isolated per logger and never retried; the failed
    /// logger's lines are dropped.
    pub async fn flush(&self, entries: Vec<LogBufferEntry>) -> FlushReport {
        let mut report = FlushReport::default();

        for entry in entries {
            let line_count = entry.lines.len();
            let result = match self.store.get_or_create_record(&entry.logger).await {
                Ok(record) => self.store.append_body(&record, &entry.lines).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(record) => report.persisted.push(PersistedLogger {
                    logger: entry.logger,
                    record_id: record.id,
                    slug: record.slug,
                    lines: line_count,
                }),
                Err(error) => {
                    warn!(
                        "[Flusher] Dropped {} lines for logger '{}': {}",
                        line_count, entry.logger, error
                    );
                    report.failures.push(FlushFailure {
                        logger: entry.logger,
                        lines: line_count,
                        error,
                    });
                }
            }
        }

        if !report.is_empty() {
            info!(
                "[Flusher] Flushed {} lines to {} records ({} failed)",
                report.lines_written(),
                report.persisted.len(),
                report.failures.len()
            );
        }

        report
    }
}
