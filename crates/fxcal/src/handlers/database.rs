//! Maintenance endpoints over the cached days.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use fxcal_core::events::parse_range;

use crate::handlers::events::RangeQuery;
use crate::handlers::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub success: bool,
    pub deleted: u64,
}

/// DELETE /database/delete?start&end
///
/// Removes both variants of every day in the range. Only the date format
/// and ordering are checked.
#[axum::debug_handler]
pub async fn delete_records(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let range = parse_range(&query.start, &query.end)?;
    let deleted = state.day_cache.delete_range(&range).await;

    let message = if deleted > 0 {
        format!("Database records deleted for {} to {}", range.start, range.end)
    } else {
        format!("No database records found for {} to {}", range.start, range.end)
    };

    Ok(Json(DeleteResponse {
        message,
        success: deleted > 0,
        deleted,
    }))
}

/// GET /database/info
#[axum::debug_handler]
pub async fn database_info(State(state): State<AppState>) -> Json<Value> {
    let mut stats = state.day_cache.stats().await;

    let total_records = stats.get("total_keys").cloned().unwrap_or(Value::from(0));
    stats.insert("total_records".to_string(), total_records);
    stats.insert(
        "timestamp".to_string(),
        Value::String(Local::now().to_rfc3339()),
    );

    Json(Value::Object(stats.into_iter().collect()))
}
