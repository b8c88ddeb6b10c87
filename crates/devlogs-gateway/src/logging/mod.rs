//! Request-scoped logging
//!
//! Bridges the HTTP request lifecycle to DevLogs units of work:
//! - Request snapshots for request ids
//! - A shared per-request logger handle

mod request_logger;

pub use request_logger::{snapshot_request, RequestLogger};
