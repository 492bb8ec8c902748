//! OpenAI-compatible `/chat/completions` client.
//!
//! DeepSeek, OpenAI and most self-hosted gateways speak this wire format, so
//! one client covers every supported provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{Completion, CompletionRequest, LlmError};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the reqwest client fails to build.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let messages = [
            CcMessage { role: "system", content: &request.system },
            CcMessage { role: "user", content: &request.prompt },
        ];
        let body = CcRequest {
            model,
            messages: &messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

fn map_transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::ApiRequest(err.to_string())
    }
}

// =============================================================================
// CHAT COMPLETIONS — wire types
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    messages: &'a [CcMessage<'a>],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CcResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<CcChoice>,
    #[serde(default)]
    usage: Option<CcUsage>,
}

#[derive(Deserialize)]
struct CcChoice {
    #[serde(default)]
    message: Option<CcResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CcResponseMessage {
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Deserialize)]
struct CcUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<Completion, LlmError> {
    let root: CcResponse = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(choice) = root.choices.into_iter().next() else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };

    // Some gateways return content as an array of `{type, text}` parts.
    let text = match choice.message.and_then(|m| m.content) {
        Some(Value::String(s)) => s,
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<String>(),
        _ => String::new(),
    };
    if text.trim().is_empty() {
        return Err(LlmError::ApiParse("chat_completions: empty message content".to_string()));
    }

    let (input_tokens, output_tokens) = root
        .usage
        .map_or((0, 0), |u| (u.prompt_tokens, u.completion_tokens));

    Ok(Completion {
        text,
        model: root.model,
        finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        input_tokens,
        output_tokens,
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
