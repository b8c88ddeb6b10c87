//! Log buffer - lines accumulated during one unit of work

use std::collections::HashMap;

use crate::domain::{LogLine, LoggerName};

/// Buffered lines of one logger, in write order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBufferEntry {
    pub logger: LoggerName,
    pub lines: Vec<LogLine>,
}

/// Ordered mapping from logger to its pending lines.
///
/// Loggers keep their first-use order and lines their append order, so a
/// flush writes everything chronologically.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: Vec<LogBufferEntry>,
    positions: HashMap<LoggerName, usize>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line for `logger`, creating its sequence on first use
    pub fn append(&mut self, logger: &LoggerName, line: LogLine) {
        match self.positions.get(logger) {
            Some(&idx) => self.entries[idx].lines.push(line),
            None => {
                self.positions.insert(logger.clone(), self.entries.len());
                self.entries.push(LogBufferEntry {
                    logger: logger.clone(),
                    lines: vec![line],
                });
            }
        }
    }

    /// Take every buffered entry, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<LogBufferEntry> {
        self.positions.clear();
        std::mem::take(&mut self.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of loggers with pending lines
    pub fn logger_count(&self) -> usize {
        self.entries.len()
    }

    /// Total pending lines across loggers
    pub fn line_count(&self) -> usize {
        self.entries.iter().map(|e| e.lines.len()).sum()
    }

    /// Pending lines of one logger
    pub fn lines(&self, logger: &LoggerName) -> &[LogLine] {
        self.positions
            .get(logger)
            .map(|&idx| self.entries[idx].lines.as_slice())
            .unwrap_or(&[])
    }
}
