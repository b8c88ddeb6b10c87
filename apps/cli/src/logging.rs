//! Tracing setup for the binary

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Prefix of the rotated log files, e.g. `devlogs.2026-01-22.log`
const LOG_PREFIX: &str = "devlogs";

/// Get the logs directory path (under the local data directory)
pub fn logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devlogs")
        .join("logs")
}

/// Initialize tracing with console and file logging
///
/// - Console: stderr, colored, compact (stdout carries command output)
/// - File: daily rotation under [`logs_dir`]
///
/// `default_level` applies when `RUST_LOG` is not set. The returned guard
/// must be kept alive for the duration of the program.
pub fn init_tracing(default_level: &str) -> Result<WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let logs_dir = logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs directory: {:?}", logs_dir))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(&logs_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // Crate names use underscores in tracing targets
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},devlogs={level},devlogs_core={level},devlogs_gateway={level},devlogs_storage={level},tower_http=info",
            level = default_level
        ))
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
