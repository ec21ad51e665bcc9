//! Persona creation: validate, load profile, create the remote agent, fetch
//! its conversation link, insert the persona row.
//!
//! The sequence cannot be wrapped in a transaction because the middle steps
//! live on the remote platform. Instead each step after agent creation
//! compensates on failure by deleting the remote agent, so a failed request
//! leaves no persona row and no orphaned agent.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::agent::{AgentPlatform, AgentSpec};
use crate::errors::AppError;
use crate::models::persona::PersonaRow;
use crate::persona::directory::{avatar_url, display_name};
use crate::persona::store::{PersonaStore, ProfileStore};

#[derive(Debug, Clone)]
pub struct CreatePersonaInput {
    pub resume_text: String,
    pub elevenlabs_api_key: String,
    pub is_public: bool,
}

pub async fn create_persona(
    profiles: &impl ProfileStore,
    personas: &impl PersonaStore,
    agents: &dyn AgentPlatform,
    user_id: Uuid,
    input: CreatePersonaInput,
) -> Result<PersonaRow, AppError> {
    // Input checks come first: an invalid request must not reach the store
    // or the network.
    if input.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text is empty. Please paste your resume or upload a file.".to_string(),
        ));
    }
    if input.elevenlabs_api_key.trim().is_empty() {
        return Err(AppError::Validation(
            "An ElevenLabs API key is required".to_string(),
        ));
    }

    let profile = profiles
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::IncompleteProfile("No profile found for this user".to_string()))?;
    if profile.first_name.trim().is_empty() || profile.last_name.trim().is_empty() {
        return Err(AppError::IncompleteProfile(
            "First and last name must be set before creating a persona".to_string(),
        ));
    }

    if personas.find_by_user_id(user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "A persona already exists for this user".to_string(),
        ));
    }

    let spec = AgentSpec::for_applicant(&profile.first_name, &profile.last_name, &input.resume_text);
    let agent_id = agents
        .create_agent(&input.elevenlabs_api_key, &spec)
        .await
        .map_err(|e| AppError::Agent(e.to_string()))?;

    let conversation_link = match agents
        .conversation_link(&input.elevenlabs_api_key, &agent_id)
        .await
    {
        Ok(link) => link,
        Err(e) => {
            compensate(agents, &input.elevenlabs_api_key, &agent_id).await;
            return Err(AppError::Agent(e.to_string()));
        }
    };

    let name = display_name(&profile.first_name, &profile.last_name);
    let now = Utc::now();
    let persona = PersonaRow {
        id: Uuid::new_v4(),
        user_id,
        avatar_url: avatar_url(&name),
        is_public: input.is_public,
        agent_id: agent_id.clone(),
        conversation_link: Some(conversation_link.clone()),
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = personas.insert(&persona).await {
        compensate(agents, &input.elevenlabs_api_key, &agent_id).await;
        return Err(e);
    }

    // The persona row is committed; mirroring the agent onto the profile is
    // best-effort and must not fail the request.
    if let Err(e) = profiles
        .set_agent_fields(user_id, &agent_id, &conversation_link)
        .await
    {
        warn!("Failed to mirror agent fields onto profile {user_id}: {e}");
    }

    Ok(persona)
}

/// Deletes the remote agent after a downstream failure. Compensation itself
/// failing is logged, not propagated: the caller's original error is the one
/// that matters.
async fn compensate(agents: &dyn AgentPlatform, api_key: &str, agent_id: &str) {
    if let Err(e) = agents.delete_agent(api_key, agent_id).await {
        warn!("Compensation failed, remote agent {agent_id} may be orphaned: {e}");
    }
}
