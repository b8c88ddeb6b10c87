//! Domain entities and value objects
//!
//! - `LoggerName` and its slug derivation
//! - `LogLine` / `RequestId` (the formatted unit of a log)
//! - `LogRecord` (the durable body of one logger)

mod log_line;
mod log_record;
mod logger;

pub use log_line::*;
pub use log_record::*;
pub use logger::*;
