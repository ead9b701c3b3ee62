/// External data provider abstractions
///
/// Two collaborators back the service: a video search/extraction utility and a
/// music catalog with audio-analysis fields. Each sits behind a trait so
/// handlers and tests never depend on a concrete backend.
use crate::{
    error::AppResult,
    models::{SearchResult, TrackFeatures},
};

pub mod spotify;
pub mod ytdlp;

pub use spotify::SpotifyCatalog;
pub use ytdlp::YtDlpSearcher;

/// Video search backend
///
/// Returns up to `max_results` records in the engine's own ranking order.
/// Failures surface as errors, never as partially populated records.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<SearchResult>>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Music catalog with audio-analysis data
///
/// `lookup_track` resolves the best textual match for a track name and merges
/// the catalog metadata with its audio features. `Ok(None)` is the explicit
/// "no match" signal; exactly one lookup happens per search action.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MusicCatalog: Send + Sync {
    async fn lookup_track(&self, name: &str) -> AppResult<Option<TrackFeatures>>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}
