use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod session;

pub use session::SessionState;

/// Base URL joined with a video id to build the embedded player source
pub const EMBED_BASE_URL: &str = "https://www.youtube.com/embed";

/// A single video returned by the search adapter
///
/// `duration` and `thumbnail` are optional in the extractor output; `None` is
/// the explicit "unavailable" marker rather than an empty string or zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub video_id: String,
    /// Duration in whole seconds, when the extractor reports one
    pub duration: Option<u64>,
    pub thumbnail: Option<String>,
}

impl SearchResult {
    /// URL for the embedded player, keyed by the video identifier
    pub fn embed_url(&self) -> String {
        format!("{}/{}", EMBED_BASE_URL, self.video_id)
    }
}

/// A search result saved to the session's favorites list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    pub result: SearchResult,
    pub saved_at: DateTime<Utc>,
}

// ============================================================================
// yt-dlp extractor output
// ============================================================================

/// Playlist envelope from `yt-dlp --flat-playlist -J`
#[derive(Debug, Deserialize)]
pub struct YtDlpPlaylist {
    #[serde(default)]
    pub entries: Vec<YtDlpEntry>,
}

/// One flat-playlist entry; fields beyond id/title are frequently absent
#[derive(Debug, Deserialize)]
pub struct YtDlpEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<YtDlpThumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct YtDlpThumbnail {
    pub url: String,
}

impl YtDlpEntry {
    /// Converts a flat entry into a SearchResult.
    ///
    /// Entries without an id or a non-empty title are dropped entirely; a
    /// partial record never reaches the caller.
    pub fn into_result(self) -> Option<SearchResult> {
        let video_id = self.id.filter(|id| !id.is_empty())?;
        let title = self.title.filter(|t| !t.is_empty())?;

        // Flat extraction reports either a single thumbnail URL or a list
        // ordered by resolution; prefer the single field, else the largest.
        let thumbnail = self
            .thumbnail
            .filter(|t| !t.is_empty())
            .or_else(|| self.thumbnails.into_iter().last().map(|t| t.url));

        Some(SearchResult {
            title,
            video_id,
            duration: self.duration.map(|d| d.round() as u64),
            thumbnail,
        })
    }
}

// ============================================================================
// Music catalog types
// ============================================================================

/// Catalog metadata merged with audio-analysis fields for one matched track
///
/// One record is appended to the session per successful lookup; the five
/// numeric fields feed the audio-feature recommender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackFeatures {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub popularity: u32,
    pub url: Option<String>,
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub fetched_at: DateTime<Utc>,
}

impl TrackFeatures {
    /// The five-dimensional reduction used for similarity ranking
    pub fn feature_vector(&self) -> [f64; 5] {
        [
            self.danceability,
            self.energy,
            self.loudness,
            self.valence,
            self.tempo,
        ]
    }
}

/// Raw track object from the catalog's search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub external_urls: CatalogExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Raw audio-analysis object from the catalog's audio-features endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl TrackFeatures {
    /// Merges the catalog match with its audio-analysis fields
    pub fn from_catalog(track: CatalogTrack, features: CatalogAudioFeatures) -> Self {
        let artist = track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();

        Self {
            id: track.id,
            name: track.name,
            artist,
            popularity: track.popularity,
            url: track.external_urls.spotify,
            danceability: features.danceability,
            energy: features.energy,
            loudness: features.loudness,
            valence: features.valence,
            tempo: features.tempo,
            fetched_at: Utc::now(),
        }
    }
}
