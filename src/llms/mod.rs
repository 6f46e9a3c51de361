//! Completion providers for the master agent.
//!
//! - [`base_llm`] - The [`BaseLLM`] trait the orchestrator calls through
//! - [`providers`] - Concrete provider implementations (Gemini)

pub mod base_llm;
pub mod providers;

#[cfg(test)]
pub(crate) mod testing;

pub use base_llm::{BaseLLM, BaseLLMState, CompletionRequest, LlmError, ProviderRole, ProviderTurn};
pub use providers::gemini::GeminiCompletion;
