use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::agent::AgentSpec;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub resume_text: String,
    pub first_name: String,
    pub last_name: String,
    pub elevenlabs_api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAgentResponse {
    pub agent_id: String,
    pub conversation_link: String,
}

/// POST /api/v1/agents
///
/// Stateless forwarder: creates a remote agent from résumé text and fetches
/// its shareable conversation link. Nothing is persisted here; the persona
/// workflow is the stateful path.
pub async fn handle_create_agent(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<CreateAgentRequest>,
) -> Result<Json<CreateAgentResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text is empty. Please paste your resume.".to_string(),
        ));
    }
    if request.elevenlabs_api_key.trim().is_empty() {
        return Err(AppError::Validation(
            "An ElevenLabs API key is required".to_string(),
        ));
    }

    let spec = AgentSpec::for_applicant(
        request.first_name.trim(),
        request.last_name.trim(),
        &request.resume_text,
    );

    let agent_id = state
        .agents
        .create_agent(&request.elevenlabs_api_key, &spec)
        .await
        .map_err(|e| AppError::Agent(e.to_string()))?;

    let conversation_link = state
        .agents
        .conversation_link(&request.elevenlabs_api_key, &agent_id)
        .await
        .map_err(|e| AppError::Agent(e.to_string()))?;

    Ok(Json(CreateAgentResponse {
        agent_id,
        conversation_link,
    }))
}
