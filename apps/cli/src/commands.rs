//! Command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use devlogs_core::{
    AccessPolicy, DevLogConfig, DevLogs, EnvSnapshot, LogAdminService, LogRecordRepository,
    LoggerName,
};
use devlogs_gateway::{AppState, DevLogServer, ServerConfig};
use devlogs_storage::{Database, SqliteLogRecordRepository};

use crate::{Cli, Commands};

/// Execute a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = DevLogConfig::from_env();
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    let repository = open_repository(&config)?;

    match cli.command {
        Commands::Log {
            logger,
            title,
            payload,
        } => log(&config, repository, &logger, &title, payload.as_deref()).await,
        Commands::List => list(repository).await,
        Commands::Show { logger } => show(repository, &logger).await,
        Commands::Download { logger, output } => download(repository, &logger, output).await,
        Commands::Empty { logger } => {
            let slug = LoggerName::new(logger).slug();
            LogAdminService::new(repository).empty(&slug).await?;
            println!("Emptied {}", slug);
            Ok(())
        }
        Commands::Delete { logger } => {
            let slug = LoggerName::new(logger).slug();
            LogAdminService::new(repository).delete(&slug).await?;
            println!("Deleted {}", slug);
            Ok(())
        }
        Commands::Serve { host, port } => {
            let mut server_config = ServerConfig::from_config(&config);
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            serve(&config, server_config, repository).await
        }
    }
}

fn open_repository(config: &DevLogConfig) -> Result<Arc<dyn LogRecordRepository>> {
    debug!("Opening database at {:?}", config.database_path);
    let db = Database::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    Ok(Arc::new(SqliteLogRecordRepository::new(Arc::new(
        Mutex::new(db),
    ))))
}

/// Parse a payload argument: JSON when it parses, plain text otherwise
fn parse_payload(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

/// Snapshot of this invocation: process environment plus arguments
fn invocation_snapshot() -> EnvSnapshot {
    let now = Utc::now();
    let mut snapshot = EnvSnapshot::from_process_env();
    snapshot.insert("argv", std::env::args().collect::<Vec<_>>().join(" "));
    snapshot.insert(
        "REQUEST_TIME_FLOAT",
        format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros()),
    );
    snapshot
}

async fn log(
    config: &DevLogConfig,
    repository: Arc<dyn LogRecordRepository>,
    logger: &str,
    title: &str,
    payload: Option<&str>,
) -> Result<()> {
    let devlogs = DevLogs::new(AccessPolicy::from_config(config), repository);
    let mut unit = devlogs.start_unit_of_work(&invocation_snapshot());

    if !unit.log(logger, title, &parse_payload(payload)) {
        println!(
            "Logging is disabled for '{}' in {} mode",
            logger,
            config.environment.as_str()
        );
        return Ok(());
    }

    let report = devlogs.end_unit_of_work(&mut unit).await;
    for persisted in &report.persisted {
        println!(
            "Logged {} line(s) to {} (request {})",
            persisted.lines,
            persisted.slug,
            unit.request_id()
        );
    }
    if let Some(failure) = report.failures.into_iter().next() {
        return Err(anyhow::Error::new(failure.error)
            .context(format!("Failed to persist log for '{}'", failure.logger)));
    }
    Ok(())
}

async fn list(repository: Arc<dyn LogRecordRepository>) -> Result<()> {
    let records = LogAdminService::new(repository).list().await?;
    if records.is_empty() {
        println!("No logs stored");
        return Ok(());
    }

    println!("{:<32} {:>8}  {}", "SLUG", "LINES", "UPDATED");
    for record in records {
        println!(
            "{:<32} {:>8}  {}",
            record.slug,
            record.line_count(),
            record.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

async fn show(repository: Arc<dyn LogRecordRepository>, logger: &str) -> Result<()> {
    let slug = LoggerName::new(logger).slug();
    let record = LogAdminService::new(repository).view(&slug).await?;
    println!("{}", record.body);
    Ok(())
}

async fn download(
    repository: Arc<dyn LogRecordRepository>,
    logger: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let slug = LoggerName::new(logger).slug();
    let (filename, body) = LogAdminService::new(repository).download(&slug).await?;
    let path = output.unwrap_or_else(|| PathBuf::from(filename));

    std::fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Saved {} to {}", slug, path.display());
    Ok(())
}

async fn serve(
    config: &DevLogConfig,
    server_config: ServerConfig,
    repository: Arc<dyn LogRecordRepository>,
) -> Result<()> {
    let devlogs = DevLogs::new(AccessPolicy::from_config(config), repository);
    let mut state = AppState::new(devlogs);
    if let Some(token) = &config.admin_token {
        state = state.with_admin_token(token.clone());
    } else if config.environment.is_production() {
        info!("No admin token configured, operator routes are closed");
    }

    DevLogServer::new(server_config, state).run().await
}
