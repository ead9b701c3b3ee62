use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use jukebox_api::config::{Config, RecommenderMode};
use jukebox_api::services::providers::{MusicCatalog, SpotifyCatalog, YtDlpSearcher};
use jukebox_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Misconfiguration (e.g. audio mode without catalog credentials) fails
    // here, before any session state exists.
    let config = Config::from_env()?;

    let searcher = Arc::new(YtDlpSearcher::new(config.ytdlp_bin.clone()));

    let catalog: Option<Arc<dyn MusicCatalog>> = match config.recommender {
        RecommenderMode::Audio => {
            let client_id = config
                .spotify_client_id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SPOTIFY_CLIENT_ID is required"))?;
            let client_secret = config
                .spotify_client_secret
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SPOTIFY_CLIENT_SECRET is required"))?;
            Some(Arc::new(SpotifyCatalog::new(
                client_id,
                client_secret,
                config.spotify_api_url.clone(),
                config.spotify_token_url.clone(),
            )))
        }
        _ => None,
    };

    let state = AppState::new(&config, searcher, catalog);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        recommender = ?config.recommender,
        "jukebox-api listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
