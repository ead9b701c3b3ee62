use serde::Deserialize;

/// Which recommendation stage runs after each search pass
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommenderMode {
    /// Search and favorites only
    #[default]
    None,
    /// Rank past search queries by text similarity to the current one
    Queries,
    /// Rank previously seen tracks by audio-feature similarity
    Audio,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of video results returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Recommendation stage: none, queries, or audio
    #[serde(default)]
    pub recommender: RecommenderMode,

    /// Path to the yt-dlp binary
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,

    /// Spotify client ID (required when recommender = audio)
    pub spotify_client_id: Option<String>,

    /// Spotify client secret (required when recommender = audio)
    pub spotify_client_secret: Option<String>,

    /// Spotify Web API base URL
    #[serde(default = "default_spotify_api_url")]
    pub spotify_api_url: String,

    /// Spotify token endpoint URL
    #[serde(default = "default_spotify_token_url")]
    pub spotify_token_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_results() -> usize {
    5
}

fn default_ytdlp_bin() -> String {
    "yt-dlp".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_spotify_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config =
            envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot serve a single session.
    ///
    /// The audio recommender needs catalog credentials before any state is
    /// created, so a missing pair is a startup error rather than a per-request
    /// failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recommender == RecommenderMode::Audio
            && (self.spotify_client_id.is_none() || self.spotify_client_secret.is_none())
        {
            anyhow::bail!(
                "recommender=audio requires SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET"
            );
        }
        if self.max_results == 0 {
            anyhow::bail!("MAX_RESULTS must be at least 1");
        }
        Ok(())
    }
}
