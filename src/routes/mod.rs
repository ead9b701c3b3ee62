use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::session_id::{make_span_with_session_id, session_id_middleware};
use crate::state::AppState;

pub mod favorites;
pub mod recommendations;
pub mod search;
pub mod session;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1; every route runs inside a session context.
/// The session middleware sits outside the trace layer so request spans
/// carry the resolved session id.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search::search))
        .route("/favorites", post(favorites::add_favorite))
        .route("/session", get(session::get_session))
        .route("/session/dark-mode", put(session::set_dark_mode))
        .route("/recommendations", get(recommendations::recommend))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session_id))
        .layer(middleware::from_fn(session_id_middleware))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
