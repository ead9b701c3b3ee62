use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{Config, RecommenderMode};
use crate::models::SessionState;
use crate::services::providers::{MusicCatalog, VideoSearch};

/// Shared application state
///
/// Sessions are isolated contexts keyed by the middleware-supplied session id.
/// The store-level lock only separates distinct sessions sharing the process;
/// within one session every interaction is a single read-then-write pass.
#[derive(Clone)]
pub struct AppState {
    pub searcher: Arc<dyn VideoSearch>,
    pub catalog: Option<Arc<dyn MusicCatalog>>,
    pub recommender: RecommenderMode,
    pub max_results: usize,
    sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
}

impl AppState {
    pub fn new(
        config: &Config,
        searcher: Arc<dyn VideoSearch>,
        catalog: Option<Arc<dyn MusicCatalog>>,
    ) -> Self {
        Self {
            searcher,
            catalog,
            recommender: config.recommender,
            max_results: config.max_results,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Runs a closure against the session's state, creating it on first use
    pub async fn with_session<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut SessionState) -> T,
    ) -> T {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(session_id).or_default();
        f(session)
    }

    /// Returns a snapshot of the session's state, creating it on first use
    pub async fn session_snapshot(&self, session_id: Uuid) -> SessionState {
        self.with_session(session_id, |session| session.clone()).await
    }
}
