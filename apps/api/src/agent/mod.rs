//! Voice-agent platform integration.
//!
//! `AgentPlatform` is the seam: the persona-creation saga and its tests talk
//! to the trait, `ElevenLabsClient` is the real backend. Carried in
//! `AppState` as `Arc<dyn AgentPlatform>`.
//!
//! Calls are single-shot with no idempotency key; a resubmission creates a
//! duplicate remote agent, which is why the saga compensates with
//! `delete_agent` instead of retrying.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::agent::prompts::{agent_description, agent_name, agent_prompt, initial_message};

const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io/v1";
const API_KEY_HEADER: &str = "xi-api-key";
/// Default voice ("Lily"). Fixed for every created agent.
pub const DEFAULT_VOICE_ID: &str = "pFZP5JQG7iQjIQuC4Bku";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Agent API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Agent API response missing field '{0}'")]
    MissingField(&'static str),
}

/// Everything needed to create a remote agent for an applicant.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub initial_message: String,
    pub voice_id: String,
}

impl AgentSpec {
    /// Builds the fixed persona spec for an applicant from their name and
    /// résumé text.
    pub fn for_applicant(first_name: &str, last_name: &str, resume_text: &str) -> Self {
        Self {
            name: agent_name(first_name, last_name),
            description: agent_description(first_name, last_name),
            prompt: agent_prompt(first_name, last_name, resume_text),
            initial_message: initial_message(first_name, last_name),
            voice_id: DEFAULT_VOICE_ID.to_string(),
        }
    }
}

/// The voice-agent platform trait. The caller supplies the credential per
/// call; it is never stored on the client or anywhere else.
#[async_trait]
pub trait AgentPlatform: Send + Sync {
    /// Creates a remote agent and returns its identifier.
    async fn create_agent(&self, api_key: &str, spec: &AgentSpec) -> Result<String, AgentError>;

    /// Fetches a shareable signed conversation URL for an agent.
    async fn conversation_link(&self, api_key: &str, agent_id: &str)
        -> Result<String, AgentError>;

    /// Deletes a remote agent. Used as compensation when a later step of the
    /// creation sequence fails.
    async fn delete_agent(&self, api_key: &str, agent_id: &str) -> Result<(), AgentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// ElevenLabs backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateAgentRequest<'a> {
    agent_name: &'a str,
    agent_description: &'a str,
    prompt: &'a str,
    initial_message: &'a str,
    voice_id: &'a str,
    conversation_config: ConversationConfig,
}

#[derive(Debug, Serialize)]
struct ConversationConfig {
    turn_detection: TurnDetection,
}

#[derive(Debug, Serialize)]
struct TurnDetection {
    #[serde(rename = "type")]
    kind: &'static str,
    threshold: f32,
    prefix_padding_ms: u32,
    silence_duration_ms: u32,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            turn_detection: TurnDetection {
                kind: "server_vad",
                threshold: 0.5,
                prefix_padding_ms: 300,
                silence_duration_ms: 200,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateAgentResponse {
    agent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    signed_url: Option<String>,
}

#[derive(Clone)]
pub struct ElevenLabsClient {
    client: Client,
}

impl ElevenLabsClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn error_for(response: reqwest::Response) -> AgentError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        AgentError::Api { status, message }
    }
}

impl Default for ElevenLabsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentPlatform for ElevenLabsClient {
    async fn create_agent(&self, api_key: &str, spec: &AgentSpec) -> Result<String, AgentError> {
        let request_body = CreateAgentRequest {
            agent_name: &spec.name,
            agent_description: &spec.description,
            prompt: &spec.prompt,
            initial_message: &spec.initial_message,
            voice_id: &spec.voice_id,
            conversation_config: ConversationConfig::default(),
        };

        let response = self
            .client
            .post(format!("{ELEVENLABS_API_BASE}/convai/agents/create"))
            .header(API_KEY_HEADER, api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: CreateAgentResponse = response.json().await?;
        let agent_id = body.agent_id.ok_or(AgentError::MissingField("agent_id"))?;
        debug!("Created remote agent {agent_id}");
        Ok(agent_id)
    }

    async fn conversation_link(
        &self,
        api_key: &str,
        agent_id: &str,
    ) -> Result<String, AgentError> {
        let response = self
            .client
            .get(format!(
                "{ELEVENLABS_API_BASE}/convai/conversation/get_signed_url"
            ))
            .query(&[("agent_id", agent_id)])
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: SignedUrlResponse = response.json().await?;
        body.signed_url
            .ok_or(AgentError::MissingField("signed_url"))
    }

    async fn delete_agent(&self, api_key: &str, agent_id: &str) -> Result<(), AgentError> {
        let response = self
            .client
            .delete(format!("{ELEVENLABS_API_BASE}/convai/agents/{agent_id}"))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        debug!("Deleted remote agent {agent_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_uses_default_voice() {
        let spec = AgentSpec::for_applicant("Jane", "Doe", "resume body");
        assert_eq!(spec.voice_id, DEFAULT_VOICE_ID);
    }

    #[test]
    fn test_spec_embeds_resume_in_prompt() {
        let spec = AgentSpec::for_applicant("Jane", "Doe", "Ten years of Rust");
        assert!(spec.prompt.contains("Ten years of Rust"));
        assert!(spec.prompt.contains("Jane Doe"));
    }

    #[test]
    fn test_turn_detection_serializes_type_field() {
        let json = serde_json::to_value(ConversationConfig::default()).unwrap();
        assert_eq!(json["turn_detection"]["type"], "server_vad");
        assert_eq!(json["turn_detection"]["silence_duration_ms"], 200);
    }
}
