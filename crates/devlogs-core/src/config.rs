//! Runtime configuration
//!
//! Everything is read from environment variables; binaries load `.env`
//! files first so the same keys work in development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable names.
pub mod keys {
    /// Environment mode (`local`, `development`, `staging`, `production`)
    pub const ENVIRONMENT: &str = "DEVLOGS_ENVIRONMENT";
    /// Logging override (unset, boolean-ish, or a single logger name)
    pub const ENABLED: &str = "DEVLOGS_ENABLED";
    /// Bearer token granting operator access in production
    pub const ADMIN_TOKEN: &str = "DEVLOGS_ADMIN_TOKEN";
    /// SQLite database path
    pub const DATABASE: &str = "DEVLOGS_DATABASE";
    /// Server bind host
    pub const HOST: &str = "DEVLOGS_HOST";
    /// Server bind port
    pub const PORT: &str = "DEVLOGS_PORT";
}

/// Default database file name
pub const DATABASE_FILE: &str = "devlogs.db";

/// Default server port
pub const DEFAULT_PORT: u16 = 45900;

/// Environment mode of the hosting process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name. Unknown values count as production.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "local" => Self::Local,
            "development" | "dev" => Self::Development,
            "staging" => Self::Staging,
            _ => Self::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Read `DEVLOGS_ENVIRONMENT`; missing means production.
    pub fn from_env() -> Self {
        std::env::var(keys::ENVIRONMENT)
            .map(|v| Self::parse(&v))
            .unwrap_or(Self::Production)
    }
}

/// Tri-state logging override.
///
/// `Unset` defers to the environment mode; the other states win over it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "logger", rename_all = "snake_case")]
pub enum LogOverride {
    #[default]
    Unset,
    /// Logging off for every logger
    Disabled,
    /// Logging on for every logger
    Enabled,
    /// Logging on for this logger only
    Only(String),
}

impl LogOverride {
    /// Parse the raw value of `DEVLOGS_ENABLED`.
    ///
    /// Empty and false-like values disable, true-like values enable,
    /// anything else names the single logger allowed to write.
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        match value.to_lowercase().as_str() {
            "" | "0" | "false" | "off" | "no" => Self::Disabled,
            "1" | "true" | "on" | "yes" => Self::Enabled,
            _ => Self::Only(value.to_string()),
        }
    }

    /// Read `DEVLOGS_ENABLED`; missing means `Unset`.
    pub fn from_env() -> Self {
        match std::env::var(keys::ENABLED) {
            Ok(v) => Self::parse(&v),
            Err(_) => Self::Unset,
        }
    }
}

/// Full configuration of a DevLogs deployment
#[derive(Debug, Clone)]
pub struct DevLogConfig {
    pub environment: Environment,
    pub enabled: LogOverride,
    pub admin_token: Option<String>,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for DevLogConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            enabled: LogOverride::Unset,
            admin_token: None,
            database_path: default_database_path(),
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl DevLogConfig {
    /// Build from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: Environment::from_env(),
            enabled: LogOverride::from_env(),
            admin_token: std::env::var(keys::ADMIN_TOKEN)
                .ok()
                .filter(|t| !t.trim().is_empty()),
            database_path: std::env::var(keys::DATABASE)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            host: std::env::var(keys::HOST).unwrap_or(defaults.host),
            port: std::env::var(keys::PORT)
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

/// Default database location for the current platform
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devlogs")
        .join(DATABASE_FILE)
}
