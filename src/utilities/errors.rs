//! Error types for the master agent.

use thiserror::Error;

use crate::llms::base_llm::LlmError;

/// Errors raised while registering child agents or orchestrating a task.
///
/// `PromptOrchestrator::handle` never returns these to its caller; they are
/// folded into a failed `OrchestrationResult` at that boundary.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Malformed input rejected before any remote call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion provider failed.
    #[error(transparent)]
    Upstream(#[from] LlmError),

    /// JSON rendering of task parameters or context failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Child agent YAML could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
