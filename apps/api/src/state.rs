use std::sync::Arc;

use sqlx::PgPool;

use crate::agent::AgentPlatform;
use crate::config::Config;
use crate::extraction::GeminiClient;
use crate::persona::store::{PgPersonaStore, PgProfileStore};

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub extractor: GeminiClient,
    /// Pluggable voice-agent backend. Real backend: `ElevenLabsClient`.
    pub agents: Arc<dyn AgentPlatform>,
    pub config: Config,
}

impl AppState {
    pub fn profiles(&self) -> PgProfileStore {
        PgProfileStore {
            db: self.db.clone(),
        }
    }

    pub fn personas(&self) -> PgPersonaStore {
        PgPersonaStore {
            db: self.db.clone(),
        }
    }
}
