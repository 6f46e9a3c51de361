//! # Master Agent
//!
//! A thin routing layer in front of the Gemini API. Each task is sent to the
//! model with a prompt describing the registered child agents, and the reply
//! is classified by keyword overlap to decide whether the task counts as
//! delegated to one of them. Delegation is a label only; no child agent
//! executes.
//!
//! - [`capabilities`] - Child agent descriptors and their registry
//! - [`llms`] - The completion provider trait and the Gemini client
//! - [`meta_agents`] - Prompt building, delegation classification, orchestration
//! - [`server`] - Axum HTTP surface
//! - [`utilities`] - Configuration and error types

pub mod capabilities;
pub mod llms;
pub mod meta_agents;
pub mod server;
pub mod utilities;

pub use capabilities::{CapabilityDescriptor, DescriptorRegistry};
pub use llms::{BaseLLM, GeminiCompletion};
pub use meta_agents::{OrchestrationResult, PromptOrchestrator, TaskRequest};

/// Crate version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
