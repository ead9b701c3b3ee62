use chrono::Utc;
use serde::Serialize;

use super::{FavoriteEntry, SearchResult, TrackFeatures};

/// Per-session context: everything one browser session accumulates
///
/// History and favorites are append-only apart from the de-duplication check
/// performed before each append. Feature vectors append unconditionally.
/// `last_results` holds the most recent search pass so the favorites command
/// can reference a result by id instead of carrying the full record.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SessionState {
    pub history: Vec<String>,
    pub favorites: Vec<FavoriteEntry>,
    pub features: Vec<TrackFeatures>,
    #[serde(skip)]
    pub last_results: Vec<SearchResult>,
    pub dark_mode: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the query unless an identical string is already present
    pub fn push_history(&mut self, query: &str) {
        if !self.history.iter().any(|q| q == query) {
            self.history.push(query.to_string());
        }
    }

    /// Saves a result to favorites unless one with the same title exists
    pub fn add_favorite(&mut self, result: SearchResult) {
        if !self.favorites.iter().any(|f| f.result.title == result.title) {
            self.favorites.push(FavoriteEntry {
                result,
                saved_at: Utc::now(),
            });
        }
    }

    /// Records the feature vector for the latest searched track
    pub fn push_features(&mut self, features: TrackFeatures) {
        self.features.push(features);
    }

    /// Remembers the results of the current render pass
    pub fn set_last_results(&mut self, results: Vec<SearchResult>) {
        self.last_results = results;
    }

    /// Looks up a result from the latest render pass by video id
    pub fn find_last_result(&self, video_id: &str) -> Option<&SearchResult> {
        self.last_results.iter().find(|r| r.video_id == video_id)
    }

    /// Upcoming items: history minus its first entry, in original order
    pub fn autoplay_queue(&self) -> &[String] {
        if self.history.len() > 1 {
            &self.history[1..]
        } else {
            &[]
        }
    }
}
