use axum::Json;
use serde_json::{json, Value};

/// GET / - Service description.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Economic calendar API with derived event text",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "features": {
            "derived_text": "Returns derived event text by default",
            "dual_variants": "Original and derived events cached separately per day",
            "flexible_output": "Choose between original or derived events"
        },
        "endpoints": {
            "/events": "GET - Retrieve events (derived by default, use ?original=true for original)",
            "/events/original": "GET - Retrieve original events (same as /events?original=true)",
            "/health": "GET - Store health check",
            "/livez": "GET - Liveness probe",
            "/database/delete": "DELETE - Delete cached days for a date range",
            "/database/info": "GET - Store statistics"
        },
        "usage_examples": {
            "derived": "/events?start=2025-08-16&end=2025-08-17",
            "original": "/events?start=2025-08-16&end=2025-08-17&original=true",
            "original_alt": "/events/original?start=2025-08-16&end=2025-08-17"
        }
    }))
}
