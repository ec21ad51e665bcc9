//! Axum route handlers for the persona workflows.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::persona::PersonaRow;
use crate::persona::account::{get_account, set_visibility, AccountView};
use crate::persona::create::{create_persona, CreatePersonaInput};
use crate::persona::directory::{list_directory, PersonaCard};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePersonaRequest {
    pub resume_text: String,
    pub elevenlabs_api_key: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

/// POST /api/v1/personas
///
/// Runs the full creation sequence for the signed-in user. The API key in
/// the request is used for the remote calls and dropped; it is not part of
/// the response or the stored row.
pub async fn handle_create_persona(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreatePersonaRequest>,
) -> Result<(StatusCode, Json<PersonaRow>), AppError> {
    let persona = create_persona(
        &state.profiles(),
        &state.personas(),
        state.agents.as_ref(),
        user.user_id,
        CreatePersonaInput {
            resume_text: request.resume_text,
            elevenlabs_api_key: request.elevenlabs_api_key,
            is_public: request.is_public,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(persona)))
}

/// GET /api/v1/account
pub async fn handle_get_account(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AccountView>, AppError> {
    let view = get_account(&state.profiles(), &state.personas(), user.user_id).await?;
    Ok(Json(view))
}

/// PATCH /api/v1/personas/visibility
pub async fn handle_set_visibility(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<VisibilityRequest>,
) -> Result<StatusCode, AppError> {
    set_visibility(&state.personas(), user.user_id, request.is_public).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/personas/public
///
/// Unauthenticated: this is the public directory.
pub async fn handle_public_directory(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonaCard>>, AppError> {
    let cards = list_directory(&state.personas()).await?;
    Ok(Json(cards))
}
