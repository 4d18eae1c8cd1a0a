//! Event read endpoints.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use fxcal_core::events::{validate_range, AcquisitionError, EventRecord, Provenance};

use crate::handlers::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub start: String,
    pub end: String,
    /// Return the site's own wording instead of the derived text.
    #[serde(default)]
    pub original: bool,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct DateRangeBody {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub success: bool,
    pub data: Vec<EventRecord>,
    pub total_events: usize,
    pub date_range: DateRangeBody,
    pub source: Provenance,
    pub timestamp: String,
    pub processing_time_ms: u64,
}

/// GET /events?start&end&original
#[axum::debug_handler]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>, AppError> {
    acquire(state, &query.start, &query.end, query.original).await
}

/// GET /events/original?start&end
#[axum::debug_handler]
pub async fn list_original_events(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<EventsResponse>, AppError> {
    acquire(state, &query.start, &query.end, true).await
}

async fn acquire(
    state: AppState,
    start: &str,
    end: &str,
    want_raw: bool,
) -> Result<Json<EventsResponse>, AppError> {
    let started = Instant::now();
    let today = Local::now().date_naive();
    let range = validate_range(start, end, today, state.limits)?;

    tracing::info!(
        start = %range.start,
        end = %range.end,
        variant = if want_raw { "original" } else { "paraphrased" },
        "Processing events request"
    );

    // Run detached so a dropped connection does not abandon a scrape halfway.
    let orchestrator = state.orchestrator.clone();
    let acquired = tokio::spawn(async move { orchestrator.get_events(range, want_raw).await })
        .await
        .map_err(|err| AcquisitionError::Task(err.to_string()))??;

    let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        events = acquired.events.len(),
        source = %acquired.provenance,
        processing_time_ms,
        "Events response ready"
    );

    Ok(Json(EventsResponse {
        success: true,
        total_events: acquired.events.len(),
        data: acquired.events,
        date_range: DateRangeBody {
            start: range.start,
            end: range.end,
        },
        source: acquired.provenance,
        timestamp: Local::now().to_rfc3339(),
        processing_time_ms,
    }))
}
