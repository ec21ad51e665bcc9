use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, mint_token, verify_password};
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub expires_at: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signup
///
/// Creates the user and its profile in one transaction, then returns a
/// session token so the client is signed in immediately.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    validate_signup(&request)?;

    let password_hash = hash_password(&request.password)?;
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = state.db.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(request.email.trim())
    .bind(&password_hash)
    .bind(now)
    .execute(&mut *tx)
    .await;

    if let Err(e) = inserted {
        if is_unique_violation(&e) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        return Err(e.into());
    }

    sqlx::query(
        "INSERT INTO profiles (user_id, first_name, last_name, updated_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(request.first_name.trim())
    .bind(request.last_name.trim())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let (access_token, expires_at) = mint_token(user_id, &state.config.jwt_secret)?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user_id,
            access_token,
            expires_at,
        }),
    ))
}

/// POST /api/v1/auth/signin
///
/// Unknown email and wrong password produce the same error so the endpoint
/// does not leak which accounts exist.
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(request.email.trim())
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or(AppError::Unauthorized)?;
    if !verify_password(&user.password_hash, &request.password) {
        return Err(AppError::Unauthorized);
    }

    let (access_token, expires_at) = mint_token(user.id, &state.config.jwt_secret)?;
    Ok(Json(SessionResponse {
        user_id: user.id,
        access_token,
        expires_at,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_signup(request: &SignUpRequest) -> Result<(), AppError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "First and last name are required".to_string(),
        ));
    }
    Ok(())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SignUpRequest {
        SignUpRequest {
            email: "jane@example.com".to_string(),
            password: "long enough pw".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(validate_signup(&request()).is_ok());
    }

    #[test]
    fn test_rejects_email_without_at() {
        let mut r = request();
        r.email = "janeexample.com".to_string();
        assert!(matches!(validate_signup(&r), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_short_password() {
        let mut r = request();
        r.password = "short".to_string();
        assert!(matches!(validate_signup(&r), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_blank_first_name() {
        let mut r = request();
        r.first_name = "   ".to_string();
        assert!(matches!(validate_signup(&r), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_blank_last_name() {
        let mut r = request();
        r.last_name = String::new();
        assert!(matches!(validate_signup(&r), Err(AppError::Validation(_))));
    }
}
