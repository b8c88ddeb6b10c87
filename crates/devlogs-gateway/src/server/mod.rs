//! Gateway Server
//!
//! HTTP server running every request inside a DevLogs unit of work, plus
//! operator routes over the stored log records.

mod handlers;
pub mod middleware;
mod state;

pub use handlers::{HealthResponse, IngestRequest, RecordSummary};
pub use middleware::{devlogs_middleware, require_log_access};
pub use state::AppState;

use anyhow::Context;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

use devlogs_core::config::{DevLogConfig, DEFAULT_PORT};

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_config(config: &DevLogConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }

    /// Get the socket address
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    /// Get the base URL for this server
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Build the Axum router
pub fn build_router(state: AppState) -> Router {
    let operator_routes = Router::new()
        .route("/devlogs", get(handlers::list_records))
        .route(
            "/devlogs/{slug}",
            get(handlers::view_record).delete(handlers::delete_record),
        )
        .route("/devlogs/{slug}/download", get(handlers::download_record))
        .route("/devlogs/{slug}/empty", post(handlers::empty_record))
        .route_layer(from_fn_with_state(state.clone(), require_log_access));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/log/{logger}", post(handlers::ingest))
        .merge(operator_routes)
        .layer(from_fn_with_state(state.clone(), devlogs_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// DevLogs HTTP server
pub struct DevLogServer {
    config: ServerConfig,
    state: AppState,
}

impl DevLogServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Run the server until Ctrl-C.
    ///
    /// In-flight requests finish and flush before the server returns.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;

        info!("[Gateway] Starting on {}", addr);
        info!(
            "[Gateway] Environment: {}",
            self.state.devlogs.policy().environment().as_str()
        );

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("[Gateway] Ready to accept connections at {}", self.config.base_url());

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("[Gateway] Shutting down");
            })
            .await?;

        Ok(())
    }

    /// Start the server in the background
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
