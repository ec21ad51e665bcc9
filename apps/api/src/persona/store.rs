//! Store traits for profiles and personas, plus their PostgreSQL
//! implementations. The creation saga and its tests depend on the traits
//! only.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::persona::{PersonaRow, PublicPersonaRecord};
use crate::models::user::ProfileRow;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError>;

    /// Mirrors the created agent onto the profile.
    async fn set_agent_fields(
        &self,
        user_id: Uuid,
        agent_id: &str,
        conversation_link: &str,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait PersonaStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<PersonaRow>, AppError>;

    async fn insert(&self, persona: &PersonaRow) -> Result<(), AppError>;

    /// Sets the public flag. Returns `false` when the user has no persona.
    /// Repeating the same value is a no-op for the stored state.
    async fn set_visibility(&self, user_id: Uuid, is_public: bool) -> Result<bool, AppError>;

    /// All personas with the public flag set, joined with owning profiles.
    async fn list_public(&self) -> Result<Vec<PublicPersonaRecord>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgProfileStore {
    pub db: PgPool,
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
        let profile = sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(profile)
    }

    async fn set_agent_fields(
        &self,
        user_id: Uuid,
        agent_id: &str,
        conversation_link: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE profiles SET agent_id = $2, conversation_link = $3, updated_at = now() \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(agent_id)
        .bind(conversation_link)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgPersonaStore {
    pub db: PgPool,
}

#[async_trait]
impl PersonaStore for PgPersonaStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<PersonaRow>, AppError> {
        let persona = sqlx::query_as("SELECT * FROM personas WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(persona)
    }

    async fn insert(&self, persona: &PersonaRow) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO personas \
             (id, user_id, avatar_url, is_public, agent_id, conversation_link, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(persona.id)
        .bind(persona.user_id)
        .bind(&persona.avatar_url)
        .bind(persona.is_public)
        .bind(&persona.agent_id)
        .bind(&persona.conversation_link)
        .bind(persona.created_at)
        .bind(persona.updated_at)
        .execute(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            // UNIQUE (user_id): a concurrent creation won the race.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                "A persona already exists for this user".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_visibility(&self, user_id: Uuid, is_public: bool) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE personas SET is_public = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(is_public)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_public(&self) -> Result<Vec<PublicPersonaRecord>, AppError> {
        let records = sqlx::query_as(
            "SELECT pr.first_name, pr.last_name, p.avatar_url, p.conversation_link \
             FROM personas p \
             JOIN profiles pr ON pr.user_id = p.user_id \
             WHERE p.is_public = TRUE \
             ORDER BY p.created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }
}
