//! Health check endpoints.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/health` - Store connectivity (always 200, status in the body)

use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /health - Pings the store.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp = Local::now().to_rfc3339();

    match state.day_cache.ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            store: "connected",
            error: None,
            timestamp,
        }),
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            Json(HealthResponse {
                status: "unhealthy",
                store: "disconnected",
                error: Some(err.to_string()),
                timestamp,
            })
        }
    }
}
