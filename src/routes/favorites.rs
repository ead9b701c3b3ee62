use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::session_id::SessionId,
    models::FavoriteEntry,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub video_id: String,
}

/// Handler for the "add to favorites" command.
///
/// The command references a result from the session's latest search pass by
/// video id; unknown or stale ids are a 404. De-duplication is by title, so
/// re-adding an already saved track returns the list unchanged.
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<Vec<FavoriteEntry>>)> {
    let favorites = state
        .with_session(session_id.0, |session| {
            let result = session.find_last_result(&request.video_id).cloned()?;
            session.add_favorite(result);
            Some(session.favorites.clone())
        })
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No result with id {} in the current search results",
                request.video_id
            ))
        })?;

    tracing::info!(
        session_id = %session_id,
        video_id = %request.video_id,
        favorites = favorites.len(),
        "Favorite saved"
    );

    Ok((StatusCode::CREATED, Json(favorites)))
}
