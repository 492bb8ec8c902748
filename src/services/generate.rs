//! Generation service — topic → prompt → LLM → decoded mind map.
//!
//! DESIGN
//! ======
//! One completion request per attempt. Transient failures (timeouts,
//! transport errors, 5xx) are retried with linear backoff (`attempt ×
//! backoff`); client errors and undecodable replies end the loop at once.
//! The whole loop runs under a caller deadline shorter than the sum of all
//! attempt timeouts, so a stuck retry sequence is abandoned as a timeout.
//!
//! Concurrent requests are independent: there is no de-duplication and no
//! shared in-flight state.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::{
    DEFAULT_GENERATE_DEADLINE_SECS, DEFAULT_GENERATE_MAX_TOKENS, DEFAULT_GENERATE_RETRIES,
    DEFAULT_GENERATE_RETRY_BACKOFF_MS, DEFAULT_GENERATE_TEMPERATURE,
};
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{CompletionRequest, LlmError};
use crate::mindmap::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::mindmap::{DecodeError, MindMap, ResponseDecoder};
use crate::services::history::HistoryItem;
use crate::state::AppState;

pub const DEFAULT_DEPTH: i64 = 3;
pub const MIN_DEPTH: i64 = 1;
pub const MAX_DEPTH: i64 = 5;

// =============================================================================
// OPTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Sleep before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub retry: RetryPolicy,
    /// Ceiling on the whole attempt loop, backoff included.
    pub deadline: Duration,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_GENERATE_MAX_TOKENS,
            temperature: DEFAULT_GENERATE_TEMPERATURE,
            retry: RetryPolicy {
                retries: DEFAULT_GENERATE_RETRIES,
                backoff: Duration::from_millis(DEFAULT_GENERATE_RETRY_BACKOFF_MS),
            },
            deadline: Duration::from_secs(DEFAULT_GENERATE_DEADLINE_SECS),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("request timed out, please try again")]
    Timeout,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl GenerateError {
    /// True for both the caller deadline and a per-request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout | Self::Llm(LlmError::Timeout))
    }
}

impl ErrorCode for GenerateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Timeout => "E_DEADLINE_EXCEEDED",
            Self::Llm(e) => e.error_code(),
            Self::Decode(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable())
    }
}

// =============================================================================
// INPUT VALIDATION
// =============================================================================

/// Check a request before any network call. Returns the trimmed topic and
/// the depth narrowed to `u8`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidInput`] for a blank topic or a depth
/// outside `1..=5`.
pub fn validate_input(topic: &str, depth: i64) -> Result<(String, u8), GenerateError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GenerateError::InvalidInput("missing topic".into()));
    }
    if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        return Err(GenerateError::InvalidInput(format!(
            "depth must be between {MIN_DEPTH} and {MAX_DEPTH}"
        )));
    }
    let depth = u8::try_from(depth).map_err(|_| GenerateError::InvalidInput("depth out of range".into()))?;
    Ok((topic.to_string(), depth))
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Generate a mind map for `topic` at `depth` levels.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidInput`] before any request, the final
/// attempt's error once retries are exhausted or a terminal failure occurs,
/// or [`GenerateError::Timeout`] when `options.deadline` expires.
pub async fn generate(
    llm: &dyn LlmChat,
    decoder: &dyn ResponseDecoder,
    topic: &str,
    depth: i64,
    options: &GenerateOptions,
) -> Result<MindMap, GenerateError> {
    let (topic, depth) = validate_input(topic, depth)?;
    info!(topic_len = topic.len(), depth, "generate: request received");

    let request = CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_prompt(&topic, depth),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    };

    // EDGE: dropping the loop future abandons the in-flight attempt; the
    // HTTP request itself is not forcibly cancelled on the wire.
    if let Ok(result) = tokio::time::timeout(options.deadline, attempt_loop(llm, decoder, &request, options.retry)).await
    {
        result
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let deadline_ms = options.deadline.as_millis() as u64;
        warn!(deadline_ms, "generate: deadline exceeded");
        Err(GenerateError::Timeout)
    }
}

async fn attempt_loop(
    llm: &dyn LlmChat,
    decoder: &dyn ResponseDecoder,
    request: &CompletionRequest,
    policy: RetryPolicy,
) -> Result<MindMap, GenerateError> {
    let mut attempt: u32 = 0;
    loop {
        if attempt > 0 {
            tokio::time::sleep(policy.delay_for(attempt)).await;
            info!(attempt, retries = policy.retries, "generate: retrying");
        }

        match attempt_once(llm, decoder, request).await {
            Ok(map) => return Ok(map),
            Err(e) if e.retryable() && attempt < policy.retries => {
                warn!(error = %e, code = e.error_code(), attempt, "generate: attempt failed; will retry");
                attempt += 1;
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), attempt, "generate: failed");
                return Err(e);
            }
        }
    }
}

async fn attempt_once(
    llm: &dyn LlmChat,
    decoder: &dyn ResponseDecoder,
    request: &CompletionRequest,
) -> Result<MindMap, GenerateError> {
    let completion = llm.complete(request).await?;
    info!(
        model = %completion.model,
        finish_reason = %completion.finish_reason,
        input_tokens = completion.input_tokens,
        output_tokens = completion.output_tokens,
        "generate: completion received"
    );
    if completion.finish_reason == "length" {
        warn!("generate: completion hit the token ceiling; reply may be truncated");
    }
    Ok(decoder.decode(&completion.text)?)
}

// =============================================================================
// STATE ENTRY POINT
// =============================================================================

/// Generate with the app's LLM and options, then record the result in history.
///
/// # Errors
///
/// Returns [`GenerateError::LlmNotConfigured`] when no LLM client is set,
/// otherwise whatever [`generate`] returns.
pub async fn handle_generate(state: &AppState, topic: &str, depth: i64) -> Result<(MindMap, HistoryItem), GenerateError> {
    // Validate first so bad input is a 400 even without an LLM.
    let (clean_topic, clean_depth) = validate_input(topic, depth)?;
    let Some(llm) = state.llm.as_ref() else {
        return Err(GenerateError::LlmNotConfigured);
    };

    let map = generate(llm.as_ref(), state.decoder.as_ref(), &clean_topic, depth, &state.config.generate).await?;

    let item = state
        .history
        .write()
        .await
        .record(&clean_topic, clean_depth, map.data.clone());
    info!(history_id = %item.id, nodes = map.data.node_count(), "generate: recorded in history");
    Ok((map, item))
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
