//! Generation route.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::mindmap::MindMapNode;
use crate::routes::ApiError;
use crate::services::generate::{self, DEFAULT_DEPTH, GenerateError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateBody {
    /// Missing topic is reported as invalid input, not a body rejection.
    #[serde(default)]
    pub topic: String,
    pub depth: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub data: MindMapNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub history_id: String,
}

/// `POST /api/generate` — ask the LLM for a mind map of `topic`.
pub async fn generate_map(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = payload?;
    let depth = body.depth.unwrap_or(DEFAULT_DEPTH);
    let (map, item) = generate::handle_generate(&state, &body.topic, depth)
        .await
        .map_err(|e| ApiError::new(generate_error_to_status(&e), &e))?;

    Ok(Json(GenerateResponse { data: map.data, summary: map.summary, history_id: item.id }))
}

pub(crate) fn generate_error_to_status(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        GenerateError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
