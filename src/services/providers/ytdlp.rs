/// yt-dlp search adapter
///
/// Shells out to the yt-dlp binary in flat-playlist JSON mode using the
/// `ytsearchN:` pseudo-URL, which returns the engine's top N matches without
/// resolving each video. Entries missing an id or title are dropped whole.
use tokio::process::Command;

use crate::{
    error::{AppError, AppResult},
    models::{SearchResult, YtDlpPlaylist},
    services::providers::VideoSearch,
};

#[derive(Debug, Clone)]
pub struct YtDlpSearcher {
    bin: String,
}

impl YtDlpSearcher {
    pub fn new(bin: String) -> Self {
        Self { bin }
    }

    /// Parses the flat-playlist JSON emitted by yt-dlp into search results
    fn parse_playlist(raw: &[u8], max_results: usize) -> AppResult<Vec<SearchResult>> {
        let playlist: YtDlpPlaylist = serde_json::from_slice(raw)
            .map_err(|e| AppError::Extractor(format!("Unparseable yt-dlp output: {}", e)))?;

        Ok(playlist
            .entries
            .into_iter()
            .filter_map(|entry| entry.into_result())
            .take(max_results)
            .collect())
    }
}

#[async_trait::async_trait]
impl VideoSearch for YtDlpSearcher {
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let search_term = format!("ytsearch{}:{}", max_results, query);

        let output = Command::new(&self.bin)
            .args(["--flat-playlist", "--no-playlist", "-J", &search_term])
            .output()
            .await
            .map_err(|e| AppError::Extractor(format!("Failed to run {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Extractor(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let results = Self::parse_playlist(&output.stdout, max_results)?;

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = "yt-dlp",
            "Video search completed"
        );

        Ok(results)
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist_preserves_engine_order() {
        let raw = br#"{
            "entries": [
                {"id": "id1", "title": "First", "duration": 60.0},
                {"id": "id2", "title": "Second"},
                {"id": "id3", "title": "Third", "duration": 180.5}
            ]
        }"#;

        let results = YtDlpSearcher::parse_playlist(raw, 5).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].video_id, "id1");
        assert_eq!(results[1].video_id, "id2");
        assert_eq!(results[2].duration, Some(181));
    }

    #[test]
    fn test_parse_playlist_caps_at_max_results() {
        let raw = br#"{
            "entries": [
                {"id": "id1", "title": "First"},
                {"id": "id2", "title": "Second"},
                {"id": "id3", "title": "Third"}
            ]
        }"#;

        let results = YtDlpSearcher::parse_playlist(raw, 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].video_id, "id2");
    }

    #[test]
    fn test_parse_playlist_drops_incomplete_entries() {
        let raw = br#"{
            "entries": [
                {"id": "id1", "title": "Kept"},
                {"title": "No id"},
                {"id": "id3"}
            ]
        }"#;

        let results = YtDlpSearcher::parse_playlist(raw, 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Kept");
    }

    #[test]
    fn test_parse_playlist_no_entries() {
        let results = YtDlpSearcher::parse_playlist(br#"{}"#, 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_playlist_invalid_json() {
        let err = YtDlpSearcher::parse_playlist(b"not json", 5).unwrap_err();
        assert!(matches!(err, AppError::Extractor(_)));
    }

    #[test]
    fn test_search_rejects_empty_query() {
        let searcher = YtDlpSearcher::new("yt-dlp".to_string());
        let err = tokio_test::block_on(searcher.search("   ", 5)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_missing_binary_is_extractor_error() {
        let searcher = YtDlpSearcher::new("yt-dlp-definitely-not-installed".to_string());
        let err = searcher.search("queen", 5).await.unwrap_err();
        assert!(matches!(err, AppError::Extractor(_)));
    }
}
