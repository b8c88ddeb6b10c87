//! DevLogs Gateway
//!
//! HTTP surface for DevLogs:
//! - Per-request units of work, flushed after the response is produced
//! - An ingestion route for remote log lines
//! - Operator routes to list, view, download, empty and delete records

pub mod logging;
pub mod server;

pub use logging::{snapshot_request, RequestLogger};
pub use server::{build_router, AppState, DevLogServer, ServerConfig};
