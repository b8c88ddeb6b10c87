//! DevLogs CLI
//!
//! Logging from scripts and shell sessions, plus the HTTP gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Log a payload under a logger (one unit of work per invocation)
//! devlogs log billing "Order" '{"id": 42}'
//!
//! # List stored logs
//! devlogs list
//!
//! # Print or download one logger's log
//! devlogs show billing
//! devlogs download billing --output billing.log
//!
//! # Clear or remove one logger's log
//! devlogs empty billing
//! devlogs delete billing
//!
//! # Serve the HTTP gateway
//! devlogs serve --port 45900
//! ```

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DevLogs - request-scoped developer logs
#[derive(Debug, Parser)]
#[command(name = "devlogs")]
#[command(version)]
#[command(about = "DevLogs - request-scoped developer logs")]
pub struct Cli {
    /// SQLite database path (default: <local data dir>/devlogs/devlogs.db)
    #[arg(long, global = true, env = "DEVLOGS_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log one line for a logger
    Log {
        /// Logger name, e.g. "billing"
        logger: String,
        /// Line title
        title: String,
        /// JSON payload; anything that is not valid JSON is logged as text
        payload: Option<String>,
    },

    /// List stored logs
    List,

    /// Print a logger's log
    Show {
        logger: String,
    },

    /// Save a logger's log to a file
    Download {
        logger: String,
        /// Output path (default: ./<slug>.log)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear a logger's log, keeping the record
    Empty {
        logger: String,
    },

    /// Delete a logger's log
    Delete {
        logger: String,
    },

    /// Serve the HTTP gateway
    Serve {
        /// Host to bind to
        #[arg(long, env = "DEVLOGS_HOST")]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "DEVLOGS_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    let _guard = logging::init_tracing(default_level)?;

    commands::run(cli).await
}
