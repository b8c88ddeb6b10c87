//! Request logger - per-request handle on a unit of work
//!
//! The middleware starts one unit of work per request and stores a
//! [`RequestLogger`] in the request extensions; handlers log through it.

use axum::extract::Request;
use axum::http::HeaderMap;
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info_span, Span};

use devlogs_core::{EnvSnapshot, FlushState, LogBufferEntry, LoggerName, RequestId, UnitOfWork};

/// Headers never copied into the request snapshot
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key"];

/// Cloneable handle on the request's unit of work.
///
/// The lock is held only for the duration of a single call.
#[derive(Clone)]
pub struct RequestLogger {
    unit: Arc<Mutex<UnitOfWork>>,
    request_id: RequestId,
}

impl RequestLogger {
    pub fn new(unit: UnitOfWork) -> Self {
        let request_id = unit.request_id().clone();
        Self {
            unit: Arc::new(Mutex::new(unit)),
            request_id,
        }
    }

    /// Log `payload` under `title` for `logger`; see [`UnitOfWork::log`]
    pub fn log<T: Serialize + ?Sized>(
        &self,
        logger: impl Into<LoggerName>,
        title: &str,
        payload: &T,
    ) -> bool {
        self.unit.lock().log(logger, title, payload)
    }

    pub fn log_message(&self, logger: impl Into<LoggerName>, content: &str) -> bool {
        self.unit.lock().log_message(logger, content)
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn state(&self) -> FlushState {
        self.unit.lock().state()
    }

    /// Drain the unit of work for flushing; see [`UnitOfWork::take_pending`]
    pub fn take_pending(&self) -> Vec<LogBufferEntry> {
        self.unit.lock().take_pending()
    }

    /// Tracing span carrying the request id
    pub fn span(&self, method: &str, path: &str) -> Span {
        info_span!(
            "request",
            request_id = %self.request_id,
            method = %method,
            path = %path,
        )
    }
}

/// Server-variable style snapshot of a request, CGI naming.
///
/// `REQUEST_TIME_FLOAT` makes two otherwise identical requests hash to
/// different request ids.
pub fn snapshot_request(request: &Request) -> EnvSnapshot {
    let uri = request.uri();
    let now = Utc::now();

    let mut snapshot = EnvSnapshot::new()
        .with("REQUEST_METHOD", request.method().as_str())
        .with("REQUEST_URI", uri.to_string())
        .with("SCRIPT_NAME", uri.path())
        .with("QUERY_STRING", uri.query().unwrap_or(""))
        .with("SERVER_PROTOCOL", format!("{:?}", request.version()))
        .with(
            "REQUEST_TIME_FLOAT",
            format!(
                "{}.{:06}",
                now.timestamp(),
                now.timestamp_subsec_micros()
            ),
        );

    insert_headers(&mut snapshot, request.headers());
    snapshot
}

fn insert_headers(snapshot: &mut EnvSnapshot, headers: &HeaderMap) {
    for (name, value) in headers {
        let name = name.as_str();
        if SENSITIVE_HEADERS.contains(&name) {
            continue;
        }
        let Ok(value) = value.to_str() else {
            continue;
        };
        let key = format!("HTTP_{}", name.to_ascii_uppercase().replace('-', "_"));
        snapshot.insert(key, value);
    }
}
