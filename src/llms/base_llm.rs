//! Base completion trait for the master agent.
//!
//! Defines the narrow interface the orchestrator needs from a hosted model:
//! one asynchronous call taking system instructions, prior conversation
//! history and a prompt, returning a single text reply.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures raised by a completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured for the provider.
    #[error("{provider} API key not set")]
    MissingApiKey { provider: String },

    /// Transport-level failure (connect, timeout, body read). Never carries
    /// the request URL.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// The provider reported an error inside a well-formed response.
    #[error("{provider} API error: {message}")]
    Provider { provider: String, message: String },

    /// The response could not be interpreted as a text reply.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        // Provider URLs may carry credentials.
        LlmError::Http(e.without_url())
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Role of a history turn in the provider's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
    System,
}

impl ProviderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prior turn handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTurn {
    pub role: ProviderRole,
    pub content: String,
}

impl ProviderTurn {
    pub fn new(role: ProviderRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Everything a provider needs for one completion call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System instructions describing the agent's role.
    pub system_instruction: String,
    /// Prior conversation, oldest first.
    pub history: Vec<ProviderTurn>,
    /// The new user message.
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// BaseLLM trait
// ---------------------------------------------------------------------------

/// Abstract completion provider.
///
/// Implementations must turn every failure (network, provider error,
/// unparseable reply) into an [`LlmError`] rather than panicking; the
/// orchestrator relies on that to report failed results.
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Get the model identifier/name.
    fn model(&self) -> &str;

    /// Get the provider name.
    fn provider(&self) -> &str;

    /// Send one completion request and await the text reply.
    async fn acall(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// BaseLLMState - shared state for LLM implementations
// ---------------------------------------------------------------------------

/// Shared configuration that concrete providers embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseLLMState {
    /// The model identifier/name.
    pub model: String,
    /// Optional API key.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Provider name (e.g., "gemini").
    pub provider: String,
    /// Optional temperature setting for response generation.
    pub temperature: Option<f64>,
}

impl BaseLLMState {
    /// Create a new `BaseLLMState` for the given provider and model.
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: base_url.into(),
            provider: provider.into(),
            temperature: None,
        }
    }

    /// Return the API key or a `MissingApiKey` error.
    pub fn require_api_key(&self) -> Result<&str, LlmError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey {
                provider: self.provider.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_role_serializes_lowercase() {
        let turn = ProviderTurn::new(ProviderRole::Model, "hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "model");
        assert_eq!(ProviderRole::System.to_string(), "system");
    }

    #[test]
    fn test_require_api_key() {
        let mut state = BaseLLMState::new("gemini", "gemini-2.0-flash-exp", "http://localhost");
        let err = state.require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "gemini API key not set");

        state.api_key = Some("   ".to_string());
        assert!(state.require_api_key().is_err());

        state.api_key = Some("secret".to_string());
        assert_eq!(state.require_api_key().unwrap(), "secret");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut state = BaseLLMState::new("gemini", "m", "http://localhost");
        state.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("secret"));
    }
}
