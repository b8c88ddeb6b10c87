//! DevLogs middleware
//!
//! `devlogs_middleware` wraps every request in a unit of work and flushes
//! it after the inner service has produced its response.
//! `require_log_access` gates the operator routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn, Instrument};

use devlogs_core::{FlushReport, LifecycleFlusher};

use super::state::AppState;
use crate::logging::{snapshot_request, RequestLogger};

/// Lifecycle adapter: one unit of work per request, flushed after the
/// inner service returns.
///
/// Flush failures are logged and never change the response. A request
/// future dropped before completion still flushes its lines from a
/// drop guard.
pub async fn devlogs_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let snapshot = snapshot_request(&request);
    let logger = RequestLogger::new(state.devlogs.start_unit_of_work(&snapshot));
    let span = logger.span(request.method().as_str(), request.uri().path());

    request.extensions_mut().insert(logger.clone());

    let guard = FlushOnDrop {
        logger,
        flusher: state.devlogs.flusher().clone(),
    };

    async move {
        let response = next.run(request).await;

        let pending = guard.logger.take_pending();
        if !pending.is_empty() {
            let report = guard.flusher.flush(pending).await;
            report_flush(&report);
        }

        response
    }
    .instrument(span)
    .await
}

/// End of lifecycle for requests that never reach the awaited flush.
///
/// Client disconnects drop the request future and handler panics unwind
/// through it; either way the armed lines are flushed on a spawned task.
struct FlushOnDrop {
    logger: RequestLogger,
    flusher: LifecycleFlusher,
}

impl Drop for FlushOnDrop {
    fn drop(&mut self) {
        let pending = self.logger.take_pending();
        if pending.is_empty() {
            return;
        }
        let lines: usize = pending.iter().map(|entry| entry.lines.len()).sum();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(
                    request_id = %self.logger.request_id(),
                    lines,
                    "Request ended early, flushing in background"
                );
                let flusher = self.flusher.clone();
                handle.spawn(async move {
                    let report = flusher.flush(pending).await;
                    report_flush(&report);
                });
            }
            Err(_) => warn!(
                request_id = %self.logger.request_id(),
                lines,
                "No runtime to flush request logs, lines dropped"
            ),
        }
    }
}

fn report_flush(report: &FlushReport) {
    for failure in &report.failures {
        warn!(
            logger = %failure.logger,
            lines = failure.lines,
            "Log flush failed: {}",
            failure.error
        );
    }
    debug!(
        lines = report.lines_written(),
        records = report.persisted.len(),
        "Request logs flushed"
    );
}

/// Operator gate: non-production is open, production needs the admin token
pub async fn require_log_access(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.can_view_logs(request.headers()) {
        warn!(
            path = %request.uri().path(),
            "Operator request rejected"
        );
        return (
            StatusCode::FORBIDDEN,
            "You are not allowed to view developer logs",
        )
            .into_response();
    }

    next.run(request).await
}
