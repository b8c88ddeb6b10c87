//! HTTP handlers for the gateway server

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use chrono::{DateTime, Utc};
use devlogs_core::{DevLogError, LogRecord};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::state::AppState;
use crate::logging::RequestLogger;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.devlogs.policy().environment().as_str().to_string(),
    })
}

/// Body of `POST /log/{logger}`
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub title: String,
    #[serde(default)]
    pub payload: Value,
}

/// Buffer one line for `logger` in the current request's unit of work
pub async fn ingest(
    Path(logger): Path<String>,
    Extension(request_logger): Extension<RequestLogger>,
    Json(body): Json<IngestRequest>,
) -> Response {
    if request_logger.log(logger.as_str(), &body.title, &body.payload) {
        (
            StatusCode::ACCEPTED,
            Json(json!({
                "logger": logger,
                "request_id": request_logger.request_id().as_str(),
            })),
        )
            .into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Record listing entry
#[derive(Serialize)]
pub struct RecordSummary {
    pub slug: String,
    pub title: String,
    pub lines: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&LogRecord> for RecordSummary {
    fn from(record: &LogRecord) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.clone(),
            lines: record.line_count(),
            updated_at: record.updated_at,
        }
    }
}

fn error_response(error: DevLogError) -> Response {
    match error {
        DevLogError::RecordNotFound(slug) => {
            (StatusCode::NOT_FOUND, format!("Log record not found: {}", slug)).into_response()
        }
        other => {
            warn!("[Gateway] Operator request failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}

pub async fn list_records(State(state): State<AppState>) -> Response {
    match state.admin.list().await {
        Ok(records) => {
            let summaries: Vec<RecordSummary> = records.iter().map(RecordSummary::from).collect();
            Json(summaries).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn view_record(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.admin.view(&slug).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(e),
    }
}

/// Record body as a `<slug>.log` attachment
pub async fn download_record(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.admin.download(&slug).await {
        Ok((filename, body)) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn empty_record(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.admin.empty(&slug).await {
        Ok(_) => {
            info!("[Gateway] Emptied log record {}", slug);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_record(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.admin.delete(&slug).await {
        Ok(()) => {
            info!("[Gateway] Deleted log record {}", slug);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}
