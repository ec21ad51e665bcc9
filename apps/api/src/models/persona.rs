use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's conversational persona. At most one row per user (UNIQUE on
/// user_id). The third-party credential used to create the remote agent is
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub avatar_url: String,
    pub is_public: bool,
    pub agent_id: String,
    pub conversation_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A public-directory row: persona joined with its owning profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicPersonaRecord {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
    pub conversation_link: Option<String>,
}
