pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::agent::handlers as agent_handlers;
use crate::auth::handlers as auth_handlers;
use crate::extraction::handlers as extraction_handlers;
use crate::persona::handlers as persona_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth_handlers::handle_signup))
        .route("/api/v1/auth/signin", post(auth_handlers::handle_signin))
        // Document extraction
        .route(
            "/api/v1/documents/extract",
            post(extraction_handlers::handle_extract),
        )
        // Agent forwarder
        .route("/api/v1/agents", post(agent_handlers::handle_create_agent))
        // Personas
        .route(
            "/api/v1/personas",
            post(persona_handlers::handle_create_persona),
        )
        .route(
            "/api/v1/personas/public",
            get(persona_handlers::handle_public_directory),
        )
        .route(
            "/api/v1/personas/visibility",
            patch(persona_handlers::handle_set_visibility),
        )
        .route("/api/v1/account", get(persona_handlers::handle_get_account))
        .with_state(state)
}
