//! LLM types — provider-neutral completion types and errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The request exceeded the client's request timeout.
    #[error("request timed out, please try again")]
    Timeout,

    /// The HTTP request to the LLM provider failed before a response arrived.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API request failed: {status} - {}", provider_message(.body))]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::Timeout => "E_API_TIMEOUT",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// Client errors (any status below 500) are permanent.
    fn retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::ApiRequest(_) | Self::ApiResponse { status: 500..=u16::MAX, .. })
    }
}

/// Pull a short message out of a provider error body.
///
/// OpenAI-compatible APIs answer `{"error": {"message": ".."}}`; some proxies
/// answer `{"error": ".."}`. Anything else falls back to the trimmed raw body.
pub(crate) fn provider_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.and_then(Value::as_str));
    match message {
        Some(m) => m.to_string(),
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().chars().take(200).collect(),
    }
}

// =============================================================================
// COMPLETION TYPES
// =============================================================================

/// A single-turn chat completion request: one system instruction plus one
/// user prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from an LLM completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Assistant reply text.
    pub text: String,
    pub model: String,
    /// Provider finish reason (`stop`, `length`, ...).
    pub finish_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for LLM completion. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a completion request to the LLM provider.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, times out, or the
    /// response is malformed.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
