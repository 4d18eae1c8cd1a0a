use axum::{
    http::{header, Method},
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        database::{database_info, delete_records},
        events::{list_events, list_original_events},
        health::{health, livez},
        root::root,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// There is no request timeout: a cold range is scraped while the client
/// waits.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/livez", get(livez))
        .route("/events", get(list_events))
        .route("/events/original", get(list_original_events))
        .route("/database/delete", delete(delete_records))
        .route("/database/info", get(database_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
