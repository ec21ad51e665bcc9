//! Session auth: argon2 password hashing, HS256 access tokens, and the
//! `CurrentUser` extractor that hands each authenticated handler the caller's
//! identity as an explicit argument.

pub mod handlers;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Access-token lifetime. Matches the session length of the hosted auth
/// service this replaces.
pub const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 7;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Mints an access token for the user. Returns the token and its expiry as a
/// unix timestamp.
pub fn mint_token(user_id: Uuid, secret: &str) -> Result<(String, i64), AppError> {
    let exp = chrono::Utc::now().timestamp() + TOKEN_TTL_SECS;
    let claims = Claims { sub: user_id, exp };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("token encoding failed: {e}")))?;
    Ok((token, exp))
}

/// Validates an access token and returns the user id it was minted for.
/// Expiry is checked by the decoder.
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;
    Ok(data.claims.sub)
}

/// The authenticated caller, extracted from the `Authorization: Bearer`
/// header. Handlers take this as an argument instead of reading any ambient
/// session state.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .ok_or(AppError::Unauthorized)?;

        let user_id = validate_token(token, &state.config.jwt_secret)?;
        Ok(CurrentUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password(&hash, "correct horse battery staple"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(!verify_password(&hash, "Tr0ub4dor&3"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_mint_then_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let (token, exp) = mint_token(user_id, "test-secret").unwrap();
        assert!(exp > chrono::Utc::now().timestamp());
        assert_eq!(validate_token(&token, "test-secret").unwrap(), user_id);
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let (token, _) = mint_token(Uuid::new_v4(), "test-secret").unwrap();
        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_validate_rejects_garbage_token() {
        assert!(matches!(
            validate_token("not.a.jwt", "test-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: chrono::Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(
            validate_token(&token, "test-secret"),
            Err(AppError::Unauthorized)
        ));
    }
}
