//! REST surface over the pipeline and the shared session slot.

use crate::github;
use crate::orchestrator::Pipeline;
use crate::session::Session;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Request payload for an analysis
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Repository URL or `owner/name`
    pub url: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current status
    pub status: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
    /// Service uptime in seconds
    pub uptime: u64,
}

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    session: Session,
    start_time: DateTime<Utc>,
}

impl AppState {
    /// Creates handler state around a pipeline with a fresh session
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            session: Session::new(),
            start_time: Utc::now(),
        }
    }
}

/// Builds the application routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/analyze", post(analyze))
        .route("/api/session", get(current_session).delete(reset_session))
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": "gitgrade",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Grades GitHub repositories with a schema-constrained model",
        "endpoints": {
            "health": "/health",
            "analyze": "/api/analyze",
            "session": "/api/session"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = (Utc::now() - state.start_time).num_seconds().max(0) as u64;
    Json(HealthResponse {
        service: "gitgrade".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime,
    })
}

async fn analyze(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected analyze request: {}", rejection.body_text());
            return error_response(400, rejection.body_text());
        }
    };
    info!("Analysis requested for {}", request.url);

    // The session ignores blank input; over HTTP it is a bad request
    if request.url.trim().is_empty() {
        if let Err(e) = github::resolve(&request.url) {
            return error_response(e.status_code(), e.user_message());
        }
    }

    let outcome = state.session.submit(&state.pipeline, &request.url).await;
    match (outcome.result, outcome.error) {
        (Some(result), _) => (StatusCode::OK, Json(json!(result))),
        (None, Some(message)) => error_response(outcome.error_status.unwrap_or(500), message),
        (None, None) => error_response(500, crate::error::GENERIC_FAILURE_MESSAGE.to_string()),
    }
}

async fn current_session(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.session.snapshot().await))
}

async fn reset_session(State(state): State<AppState>) -> StatusCode {
    state.session.reset().await;
    StatusCode::NO_CONTENT
}

fn error_response(status: u16, message: String) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": message })))
}
