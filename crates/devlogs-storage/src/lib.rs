//! DevLogs Storage Layer
//!
//! SQLite persistence for log records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │          DevLogs / LogStore / LogAdminService        │
//! ├──────────────────────────────────────────────────────┤
//! │               LogRecordRepository                    │
//! ├──────────────────────────────────────────────────────┤
//! │            SqliteLogRecordRepository                 │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │              (SQLite, migrations)                    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use devlogs_storage::{Database, SqliteLogRecordRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//!
//! let repository = Arc::new(SqliteLogRecordRepository::new(db.clone()));
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;
