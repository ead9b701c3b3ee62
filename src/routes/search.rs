use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::RecommenderMode,
    error::{AppError, AppResult},
    middleware::session_id::SessionId,
    models::{FavoriteEntry, SearchResult, SessionState},
    services::recommender::{self, TrackRecommendation, DEFAULT_TRACK_RECOMMENDATIONS},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// One result as the UI renders it: header fields, player source, and an
/// explicit placeholder signal when the thumbnail is unavailable
#[derive(Debug, Serialize)]
pub struct ResultCard {
    pub title: String,
    pub video_id: String,
    pub duration: Option<u64>,
    pub thumbnail: Option<String>,
    pub thumbnail_missing: bool,
    pub embed_url: String,
}

impl From<&SearchResult> for ResultCard {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            video_id: result.video_id.clone(),
            duration: result.duration,
            thumbnail: result.thumbnail.clone(),
            thumbnail_missing: result.thumbnail.is_none(),
            embed_url: result.embed_url(),
        }
    }
}

/// The sidebar panels rendered after every pass
#[derive(Debug, Serialize)]
pub struct Sidebar {
    pub history: Vec<String>,
    pub favorites: Vec<FavoriteEntry>,
    pub autoplay_queue: Vec<String>,
}

impl From<&SessionState> for Sidebar {
    fn from(session: &SessionState) -> Self {
        Self {
            history: session.history.clone(),
            favorites: session.favorites.clone(),
            autoplay_queue: session.autoplay_queue().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ResultCard>,
    pub related_queries: Vec<String>,
    pub recommended_tracks: Vec<TrackRecommendation>,
    pub sidebar: Sidebar,
    /// User-visible notice when the search backend degraded to an empty set
    pub notice: Option<String>,
}

/// Handler for one full search interaction pass.
///
/// Appends the query to history, fetches videos, runs the configured
/// recommender stage, and returns everything the UI renders. A failing search
/// backend degrades to an empty result set with a notice; a failing or empty
/// catalog lookup merely skips the recommendation stage.
pub async fn search(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let history = state
        .with_session(session_id.0, |session| {
            session.push_history(&query);
            session.history.clone()
        })
        .await;

    let (results, notice) = match state.searcher.search(&query, state.max_results).await {
        Ok(results) if results.is_empty() => {
            (Vec::new(), Some("No videos found for this search.".to_string()))
        }
        Ok(results) => (results, None),
        Err(e) => {
            tracing::warn!(
                session_id = %session_id,
                query = %query,
                error = %e,
                "Video search failed, degrading to empty result set"
            );
            (
                Vec::new(),
                Some("Search is unavailable right now. Please try again.".to_string()),
            )
        }
    };

    state
        .with_session(session_id.0, |session| {
            session.set_last_results(results.clone());
        })
        .await;

    let mut related_queries = Vec::new();
    let mut recommended_tracks = Vec::new();

    match state.recommender {
        RecommenderMode::None => {}
        RecommenderMode::Queries => {
            related_queries = recommender::related_queries(&query, &history);
        }
        RecommenderMode::Audio => {
            recommended_tracks = audio_recommendations(&state, session_id, &query).await;
        }
    }

    let sidebar = state
        .with_session(session_id.0, |session| Sidebar::from(&*session))
        .await;

    tracing::info!(
        session_id = %session_id,
        query = %query,
        results = results.len(),
        related_queries = related_queries.len(),
        recommended_tracks = recommended_tracks.len(),
        "Search pass completed"
    );

    Ok(Json(SearchResponse {
        results: results.iter().map(ResultCard::from).collect(),
        related_queries,
        recommended_tracks,
        sidebar,
        notice,
    }))
}

/// One catalog lookup per search action, then ranking over the session's
/// accumulated feature vectors. A not-found or failed lookup skips the stage.
async fn audio_recommendations(
    state: &AppState,
    session_id: SessionId,
    query: &str,
) -> Vec<TrackRecommendation> {
    let Some(catalog) = state.catalog.as_ref() else {
        return Vec::new();
    };

    let features = match catalog.lookup_track(query).await {
        Ok(Some(features)) => features,
        Ok(None) => {
            tracing::info!(
                session_id = %session_id,
                query = %query,
                "No catalog match, skipping track recommendations"
            );
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(
                session_id = %session_id,
                query = %query,
                error = %e,
                "Catalog lookup failed, skipping track recommendations"
            );
            return Vec::new();
        }
    };

    state
        .with_session(session_id.0, |session| {
            session.push_features(features);
            recommender::similar_tracks(&session.features, DEFAULT_TRACK_RECOMMENDATIONS)
        })
        .await
}
