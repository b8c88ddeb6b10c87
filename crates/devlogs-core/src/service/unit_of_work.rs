//! Unit of work - the explicit, per-request logging context
//!
//! A [`UnitOfWork`] is started when a request (or process invocation)
//! begins and ended once when it finishes. Log calls in between are gated,
//! formatted and buffered; ending the unit flushes the buffer once.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::access_policy::AccessPolicy;
use super::lifecycle::{FlushReport, FlushState, LifecycleFlusher};
use super::log_buffer::{LogBuffer, LogBufferEntry};
use super::log_store::LogStore;
use super::request_context::{EnvSnapshot, RequestContext};
use crate::domain::{LogLine, LoggerName, RequestId};
use crate::dump::dump;
use crate::repository::LogRecordRepository;

/// Logging context owned by one unit of work
pub struct UnitOfWork {
    context: RequestContext,
    policy: Arc<AccessPolicy>,
    buffer: LogBuffer,
    state: FlushState,
}

impl UnitOfWork {
    /// Start a unit of work, capturing its request id from `snapshot`
    pub fn start(policy: Arc<AccessPolicy>, snapshot: &EnvSnapshot) -> Self {
        let context = RequestContext::capture(snapshot);
        debug!(
            "[UnitOfWork] Started request {}",
            context.request_id()
        );
        Self {
            context,
            policy,
            buffer: LogBuffer::new(),
            state: FlushState::Idle,
        }
    }

    /// Log `payload` under `title`: the line reads `<title> = <dump>`.
    ///
    /// Returns whether the line was buffered; a denied call is dropped.
    pub fn log<T: Serialize + ?Sized>(
        &mut self,
        logger: impl Into<LoggerName>,
        title: &str,
        payload: &T,
    ) -> bool {
        let logger = logger.into();
        if !self.policy.can_log(&logger) {
            trace!("[UnitOfWork] Dropped line for logger '{}'", logger);
            return false;
        }
        let content = format!("{} = {}", title, dump(payload));
        self.push(&logger, &content);
        true
    }

    /// Log a preformatted message
    pub fn log_message(&mut self, logger: impl Into<LoggerName>, content: &str) -> bool {
        let logger = logger.into();
        if !self.policy.can_log(&logger) {
            trace!("[UnitOfWork] Dropped line for logger '{}'", logger);
            return false;
        }
        self.push(&logger, content);
        true
    }

    fn push(&mut self, logger: &LoggerName, content: &str) {
        let line = LogLine::format(Utc::now(), self.context.request_id(), content);
        self.buffer.append(logger, line);
        if self.state != FlushState::Armed {
            debug!(
                "[UnitOfWork] Flush armed for request {}",
                self.context.request_id()
            );
            self.state = FlushState::Armed;
        }
    }

    /// End-of-lifecycle transition: Armed becomes Flushed and the buffer is
    /// handed over. Idle and Flushed units yield nothing.
    pub fn take_pending(&mut self) -> Vec<LogBufferEntry> {
        match self.state {
            FlushState::Armed => {
                self.state = FlushState::Flushed;
                self.buffer.drain()
            }
            FlushState::Idle | FlushState::Flushed => Vec::new(),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        self.context.request_id()
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn state(&self) -> FlushState {
        self.state
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.state == FlushState::Armed {
            warn!(
                "[UnitOfWork] Request {} dropped with {} unflushed lines",
                self.context.request_id(),
                self.buffer.line_count()
            );
        }
    }
}

/// Entry point tying policy, store and flusher together.
///
/// Cheap to clone; share one per process.
#[derive(Clone)]
pub struct DevLogs {
    policy: Arc<AccessPolicy>,
    flusher: LifecycleFlusher,
}

impl DevLogs {
    pub fn new(policy: AccessPolicy, repository: Arc<dyn LogRecordRepository>) -> Self {
        Self {
            policy: Arc::new(policy),
            flusher: LifecycleFlusher::new(LogStore::new(repository)),
        }
    }

    pub fn policy(&self) -> &Arc<AccessPolicy> {
        &self.policy
    }

    pub fn flusher(&self) -> &LifecycleFlusher {
        &self.flusher
    }

    pub fn store(&self) -> &LogStore {
        self.flusher.store()
    }

    /// Lifecycle hook: a unit of work begins
    pub fn start_unit_of_work(&self, snapshot: &EnvSnapshot) -> UnitOfWork {
        UnitOfWork::start(self.policy.clone(), snapshot)
    }

    /// Lifecycle hook: a unit of work ends. Flushes at most once.
    pub async fn end_unit_of_work(&self, unit: &mut UnitOfWork) -> FlushReport {
        let pending = unit.take_pending();
        if pending.is_empty() {
            return FlushReport::default();
        }
        self.flusher.flush(pending).await
    }
}
