//! Account view and visibility updates for the signed-in user.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::persona::PersonaRow;
use crate::models::user::ProfileRow;
use crate::persona::store::{PersonaStore, ProfileStore};

#[derive(Debug, Serialize)]
pub struct AccountView {
    pub profile: ProfileRow,
    pub persona: Option<PersonaRow>,
}

/// The profile must exist (it is created at sign-up); the persona is
/// optional and its absence is not an error.
pub async fn get_account(
    profiles: &impl ProfileStore,
    personas: &impl PersonaStore,
    user_id: Uuid,
) -> Result<AccountView, AppError> {
    let profile = profiles
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No profile found for this user".to_string()))?;
    let persona = personas.find_by_user_id(user_id).await?;
    Ok(AccountView { profile, persona })
}

/// Single update of the public flag; last write wins. Repeating the same
/// value is a no-op for the stored state.
pub async fn set_visibility(
    personas: &impl PersonaStore,
    user_id: Uuid,
    is_public: bool,
) -> Result<(), AppError> {
    let updated = personas.set_visibility(user_id, is_public).await?;
    if !updated {
        return Err(AppError::NotFound(
            "No persona found for this user".to_string(),
        ));
    }
    Ok(())
}
