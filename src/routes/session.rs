use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::session_id::SessionId,
    models::FavoriteEntry,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub history: Vec<String>,
    pub favorites: Vec<FavoriteEntry>,
    pub autoplay_queue: Vec<String>,
    pub dark_mode: bool,
}

/// Handler returning the sidebar snapshot for the current session
pub async fn get_session(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<SessionResponse> {
    let session = state.session_snapshot(session_id.0).await;

    Json(SessionResponse {
        session_id: session_id.to_string(),
        autoplay_queue: session.autoplay_queue().to_vec(),
        history: session.history,
        favorites: session.favorites,
        dark_mode: session.dark_mode,
    })
}

#[derive(Debug, Deserialize)]
pub struct DarkModeRequest {
    pub enabled: bool,
}

/// Handler for the dark-mode toggle
pub async fn set_dark_mode(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<DarkModeRequest>,
) -> StatusCode {
    state
        .with_session(session_id.0, |session| {
            session.dark_mode = request.enabled;
        })
        .await;
    StatusCode::OK
}
