use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    middleware::session_id::SessionId,
    services::recommender::{self, TrackRecommendation, DEFAULT_TRACK_RECOMMENDATIONS},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    k: Option<usize>,
}

/// Handler ranking the session's tracks against the most recent one.
///
/// Sessions without accumulated feature vectors (including every session when
/// the audio recommender is disabled) get an empty list, not an error.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(params): Query<RecommendationQuery>,
) -> Json<Vec<TrackRecommendation>> {
    let k = params.k.unwrap_or(DEFAULT_TRACK_RECOMMENDATIONS);

    let recommendations = state
        .with_session(session_id.0, |session| {
            recommender::similar_tracks(&session.features, k)
        })
        .await;

    Json(recommendations)
}
