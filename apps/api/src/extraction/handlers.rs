use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::{Extraction, UNREADABLE_MESSAGE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub base64_data: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// POST /api/v1/documents/extract
///
/// Forwards a base64-encoded document to the extraction model and returns the
/// extracted text. An unreadable document is a 200 with a fixed message so
/// the client can show it inline instead of as a failure.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if request.base64_data.trim().is_empty() || request.mime_type.trim().is_empty() {
        return Err(AppError::Validation(
            "base64_data and mime_type are required".to_string(),
        ));
    }

    let outcome = state
        .extractor
        .extract(&request.base64_data, &request.mime_type)
        .await
        .map_err(|e| AppError::Extraction(e.to_string()))?;

    let text = match outcome {
        Extraction::Text(text) => text,
        Extraction::Unreadable => UNREADABLE_MESSAGE.to_string(),
    };
    Ok(Json(ExtractResponse { text }))
}
