//! # DevLogs Core Library
//!
//! Request-scoped developer logging: lines are gated by an access policy,
//! buffered per logger during a unit of work and appended to one persistent
//! record per logger when the unit of work ends.
//!
//! ## Modules
//!
//! - `config` - Environment mode, log override and runtime configuration
//! - `domain` - Core entities (LoggerName, LogRecord, LogLine, RequestId)
//! - `dump` - Human-readable structure dump of payloads
//! - `error` - Error types
//! - `repository` - Data access traits
//! - `service` - Unit of work, flushing and operator services

pub mod config;
pub mod domain;
pub mod dump;
pub mod error;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::{DevLogConfig, Environment, LogOverride};
pub use domain::*;
pub use dump::dump;
pub use error::DevLogError;
pub use repository::*;
pub use service::*;
