//! Master agent orchestration.
//!
//! The master agent fronts a hosted model and labels each task as either
//! handled by itself or delegated to one of the registered child agents.
//! No child agent ever runs; delegation is a label on the result.
//!
//! # Architecture
//!
//! - **Types** (`types`): `TaskRequest`, `TaskContext`, `ConversationTurn`,
//!   `OrchestrationResult`.
//! - **Prompts** (`prompts`): system/user prompt rendering and history
//!   translation into the provider's role vocabulary.
//! - **Delegation** (`delegation`): the keyword classifier.
//! - **Orchestrator** (`orchestrator`): ties the above to a `BaseLLM`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use master_agent::llms::GeminiCompletion;
//! use master_agent::meta_agents::{PromptOrchestrator, TaskRequest};
//!
//! let gemini = GeminiCompletion::new("gemini-2.0-flash-exp", Some(api_key));
//! let orchestrator = PromptOrchestrator::with_default_agents(Arc::new(gemini));
//!
//! let result = orchestrator.handle(TaskRequest::new("code_generation", params)).await;
//! println!("{:?}", result.delegated_to());
//! ```

pub mod delegation;
pub mod orchestrator;
pub mod prompts;
pub mod types;

// Re-exports for convenience.
pub use delegation::{analyze_for_delegation, DelegationDecision, MatchKind};
pub use orchestrator::{PromptOrchestrator, ORCHESTRATOR_NAME};
pub use types::{ConversationTurn, OrchestrationResult, Role, TaskContext, TaskRequest};
