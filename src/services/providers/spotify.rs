/// Spotify Web API catalog provider
///
/// API flow per lookup:
/// 1. Best match: /v1/search?type=track&limit=1 → catalog metadata
/// 2. Audio analysis: /v1/audio-features/{id} → numeric feature fields
///
/// Responses are merged into one TrackFeatures record. There is no response
/// caching and no retry; the client-credentials bearer token is the only
/// state held between calls, refreshed when it nears expiry.
use chrono::{DateTime, Duration, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogAudioFeatures, CatalogTrack, TrackFeatures},
    services::providers::MusicCatalog,
};

/// Refresh the token this many seconds before the reported expiry
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

pub struct SpotifyCatalog {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    api_url: String,
    token_url: String,
    token: Mutex<Option<BearerToken>>,
}

#[derive(Debug, Clone)]
struct BearerToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TrackSearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<CatalogTrack>,
}

impl SpotifyCatalog {
    pub fn new(
        client_id: String,
        client_secret: String,
        api_url: String,
        token_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            client_id,
            client_secret,
            api_url,
            token_url,
            token: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token, fetching a fresh one when needed
    async fn bearer_token(&self) -> AppResult<String> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify token endpoint returned status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        let token = BearerToken {
            access_token: token_response.access_token,
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        };

        tracing::debug!(
            expires_at = %token.expires_at,
            provider = "spotify",
            "Bearer token refreshed"
        );

        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Finds the best textual match for a track name, if any
    async fn search_best_match(&self, name: &str) -> AppResult<Option<CatalogTrack>> {
        let token = self.bearer_token().await?;
        let url = format!("{}/v1/search", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("q", name), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify search returned status {}: {}",
                status, body
            )));
        }

        let search_response: TrackSearchResponse = response.json().await?;
        Ok(search_response.tracks.items.into_iter().next())
    }

    /// Fetches the audio-analysis fields for a matched track
    async fn fetch_audio_features(&self, track_id: &str) -> AppResult<CatalogAudioFeatures> {
        let token = self.bearer_token().await?;
        let url = format!("{}/v1/audio-features/{}", self.api_url, track_id);

        let response = self.http_client.get(&url).bearer_auth(&token).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify audio-features returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MusicCatalog for SpotifyCatalog {
    async fn lookup_track(&self, name: &str) -> AppResult<Option<TrackFeatures>> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Track name cannot be empty".to_string(),
            ));
        }

        let Some(track) = self.search_best_match(name).await? else {
            tracing::info!(
                track = %name,
                provider = "spotify",
                "No catalog match found"
            );
            return Ok(None);
        };

        let features = self.fetch_audio_features(&track.id).await?;
        let merged = TrackFeatures::from_catalog(track, features);

        tracing::info!(
            track = %merged.name,
            artist = %merged.artist,
            provider = "spotify",
            "Track features fetched"
        );

        Ok(Some(merged))
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
