//! Google Gemini completion provider.
//!
//! Talks to the Gemini `generateContent` REST endpoint. One request per
//! call, no retry: a failed attempt is reported to the caller as-is.
//!
//! # Authentication
//!
//! The API key is passed in the `x-goog-api-key` header, never in the URL.
//! Transport errors are stripped of their URL on conversion to `LlmError`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llms::base_llm::{
    BaseLLM, BaseLLMState, CompletionRequest, LlmError, ProviderRole,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Public Gemini API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// GeminiCompletion provider
// ---------------------------------------------------------------------------

/// Gemini completion client.
///
/// # Example
///
/// ```ignore
/// let gemini = GeminiCompletion::new(DEFAULT_MODEL, Some(api_key));
/// let reply = gemini.acall(request).await?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiCompletion {
    /// Shared base LLM state.
    #[serde(flatten)]
    pub state: BaseLLMState,
    /// Nucleus sampling parameter.
    pub top_p: Option<f64>,
    /// Top-K sampling parameter.
    pub top_k: Option<u32>,
    /// Maximum output tokens.
    pub max_output_tokens: Option<u32>,
    /// Per-request timeout.
    #[serde(skip, default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl GeminiCompletion {
    /// Create a new Gemini provider with the standard generation settings
    /// (temperature 0.7, top-K 40, top-P 0.95, 8192 output tokens).
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        let mut state = BaseLLMState::new("gemini", model, DEFAULT_BASE_URL);
        state.api_key = api_key;
        state.temperature = Some(0.7);

        Self {
            state,
            top_p: Some(0.95),
            top_k: Some(40),
            max_output_tokens: Some(8192),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder: override the API host (used for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.state.base_url = base_url.into();
        self
    }

    /// Builder: override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.state.base_url.trim_end_matches('/'),
            self.state.model
        )
    }

    /// Build generation config for the Gemini API.
    pub fn generation_config(&self) -> Value {
        let mut config = serde_json::Map::new();
        if let Some(temp) = self.state.temperature {
            config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(top_k) = self.top_k {
            config.insert("topK".to_string(), serde_json::json!(top_k));
        }
        if let Some(top_p) = self.top_p {
            config.insert("topP".to_string(), serde_json::json!(top_p));
        }
        if let Some(max_tokens) = self.max_output_tokens {
            config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        Value::Object(config)
    }

    /// Build the complete request body.
    ///
    /// Gemini has no `system` role inside `contents`, so system turns from
    /// the history are appended to `systemInstruction` after the main
    /// instructions. The prompt becomes the final `user` content.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let mut system_parts: Vec<&str> = Vec::new();
        if !request.system_instruction.is_empty() {
            system_parts.push(&request.system_instruction);
        }

        let mut contents: Vec<Value> = Vec::with_capacity(request.history.len() + 1);
        for turn in &request.history {
            match turn.role {
                ProviderRole::System => system_parts.push(&turn.content),
                role => contents.push(serde_json::json!({
                    "role": role.as_str(),
                    "parts": [{ "text": turn.content }],
                })),
            }
        }
        contents.push(serde_json::json!({
            "role": ProviderRole::User.as_str(),
            "parts": [{ "text": request.prompt }],
        }));

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": self.generation_config(),
        });

        if !system_parts.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system_parts.join("\n\n") }]
            });
        }

        body
    }

    /// Extract the reply text from a Gemini API response.
    pub fn parse_response(&self, response: &Value) -> Result<String, LlmError> {
        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown Gemini API error");
            return Err(LlmError::Provider {
                provider: self.state.provider.clone(),
                message: message.to_string(),
            });
        }

        let candidates = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .filter(|c| !c.is_empty());

        let Some(candidates) = candidates else {
            if let Some(reason) = response
                .pointer("/promptFeedback/blockReason")
                .and_then(|r| r.as_str())
            {
                return Err(LlmError::Provider {
                    provider: self.state.provider.clone(),
                    message: format!("prompt blocked: {}", reason),
                });
            }
            return Err(LlmError::MalformedResponse(
                "No candidates in Gemini response".to_string(),
            ));
        };

        let parts = candidates[0]
            .pointer("/content/parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                LlmError::MalformedResponse("No content.parts in Gemini response".to_string())
            })?;

        let text_parts: Vec<&str> = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        if text_parts.is_empty() {
            return Err(LlmError::MalformedResponse(
                "No text parts in Gemini response".to_string(),
            ));
        }

        Ok(text_parts.concat())
    }
}

#[async_trait]
impl BaseLLM for GeminiCompletion {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        &self.state.provider
    }

    async fn acall(&self, request: CompletionRequest) -> Result<String, LlmError> {
        log::debug!(
            "GeminiCompletion.acall: model={}, history={}",
            self.state.model,
            request.history.len(),
        );

        let api_key = self.state.require_api_key()?;
        let body = self.build_request_body(&request);

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let response = client
            .post(self.api_endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            log::warn!("Gemini API returned {}", status);
            return Err(LlmError::Api {
                provider: self.state.provider.clone(),
                status: status.as_u16(),
                body: truncate(&response_text, 500),
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::MalformedResponse(format!(
                "Failed to parse Gemini response: {} - Body: {}",
                e,
                truncate(&response_text, 500)
            ))
        })?;

        if let Some(usage) = response_json.get("usageMetadata") {
            log::debug!("Gemini usage: {}", usage);
        }

        self.parse_response(&response_json)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
