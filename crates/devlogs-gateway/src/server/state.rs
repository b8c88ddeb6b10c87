//! Shared state for the gateway router

use axum::http::{header, HeaderMap};
use std::sync::Arc;

use devlogs_core::{DevLogs, LogAdminService};

/// App state shared by middleware and handlers
#[derive(Clone)]
pub struct AppState {
    pub devlogs: DevLogs,
    pub admin: Arc<LogAdminService>,
    admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(devlogs: DevLogs) -> Self {
        let admin = Arc::new(LogAdminService::new(devlogs.store().repository().clone()));
        Self {
            devlogs,
            admin,
            admin_token: None,
        }
    }

    /// Require this bearer token for operator routes in production
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.admin_token = (!token.is_empty()).then(|| Arc::from(token));
        self
    }

    /// Whether the request carries the configured admin token.
    ///
    /// Always false when no token is configured.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.admin_token.as_deref() else {
            return false;
        };

        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected)
    }

    /// Operator visibility for a request
    pub fn can_view_logs(&self, headers: &HeaderMap) -> bool {
        self.devlogs
            .policy()
            .can_view_logs(self.is_authorized(headers))
    }
}
