//! Document text extraction via the Gemini generateContent endpoint.
//!
//! The uploaded file never touches disk: the client sends it base64-encoded,
//! the payload is forwarded inline to the model, and only the extracted text
//! survives the request.

pub mod handlers;
pub mod prompts;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::extraction::prompts::EXTRACTION_PROMPT;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all extraction calls.
pub const MODEL: &str = "gemini-pro-vision";

/// Sentinel the model is instructed to emit for unreadable documents.
const UNREADABLE_SENTINEL: &str = "[[EMPTY_OR_UNREADABLE_DOCUMENT]]";
/// User-facing replacement for the sentinel. Returned with a 200, not an
/// error: an unreadable upload is an answer, not a failure.
pub const UNREADABLE_MESSAGE: &str =
    "The document appears to be empty or could not be read by the AI.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Extraction API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Extraction returned no text")]
    EmptyContent,
}

/// Outcome of a successful extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Non-empty extracted text.
    Text(String),
    /// The model reported the document as empty or unreadable.
    Unreadable,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the document-extraction model. One outbound call per request;
/// a failed call is surfaced to the caller rather than retried.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Extracts text from a base64-encoded document of the declared media
    /// type.
    pub async fn extract(
        &self,
        base64_data: &str,
        mime_type: &str,
    ) -> Result<Extraction, ExtractionError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(EXTRACTION_PROMPT),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type,
                            data: base64_data,
                        }),
                    },
                ],
            }],
        };

        let url = format!(
            "{GEMINI_API_BASE}/{MODEL}:generateContent?key={}",
            self.api_key
        );
        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = first_candidate_text(&body).ok_or(ExtractionError::EmptyContent)?;

        debug!("Extraction succeeded: {} chars", text.len());
        Ok(classify(text))
    }
}

fn first_candidate_text(response: &GenerateContentResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .parts
        .iter()
        .find_map(|p| p.text.as_deref())
}

/// Maps the raw model output onto an extraction outcome: the unreadable
/// sentinel, or trimmed text. Blank output counts as unreadable.
fn classify(text: &str) -> Extraction {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == UNREADABLE_SENTINEL {
        Extraction::Unreadable
    } else {
        Extraction::Text(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_plain_text() {
        assert_eq!(
            classify("Jane Doe\nSoftware Engineer"),
            Extraction::Text("Jane Doe\nSoftware Engineer".to_string())
        );
    }

    #[test]
    fn test_classify_trims_whitespace() {
        assert_eq!(
            classify("  resume body  \n"),
            Extraction::Text("resume body".to_string())
        );
    }

    #[test]
    fn test_classify_sentinel_is_unreadable() {
        assert_eq!(
            classify("[[EMPTY_OR_UNREADABLE_DOCUMENT]]"),
            Extraction::Unreadable
        );
    }

    #[test]
    fn test_classify_padded_sentinel_is_unreadable() {
        assert_eq!(
            classify("  [[EMPTY_OR_UNREADABLE_DOCUMENT]]\n"),
            Extraction::Unreadable
        );
    }

    #[test]
    fn test_classify_blank_output_is_unreadable() {
        assert_eq!(classify("   \n "), Extraction::Unreadable);
    }

    #[test]
    fn test_sentinel_mentioned_inside_text_is_kept() {
        let text = "The marker [[EMPTY_OR_UNREADABLE_DOCUMENT]] appears in prose";
        assert!(matches!(classify(text), Extraction::Text(_)));
    }

    #[test]
    fn test_first_candidate_text_picks_first_text_part() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: CandidateContent {
                    parts: vec![
                        CandidatePart { text: None },
                        CandidatePart {
                            text: Some("extracted".to_string()),
                        },
                    ],
                },
            }],
        };
        assert_eq!(first_candidate_text(&response), Some("extracted"));
    }

    #[test]
    fn test_first_candidate_text_empty_candidates() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert_eq!(first_candidate_text(&response), None);
    }
}
