//! # Child Agent Registry
//!
//! Descriptors of the specialists the master agent can label a task as
//! delegated to. The orchestrator renders them into its system prompt and
//! matches their names and capability tags against the model's reply.
//!
//! ## Resolution Flow
//!
//! 1. Startup seeds `DataAnalysisAgent`, `ContentGenerationAgent`, `CodeAssistantAgent`
//! 2. Optional YAML file adds more (`CHILD_AGENTS_FILE`)
//! 3. `POST /registerChildAgent` adds or replaces entries at runtime
//! 4. Each request classifies against a snapshot taken when it starts

pub mod capability;
pub mod registry;

pub use capability::{default_descriptors, CapabilityDescriptor};
pub use registry::DescriptorRegistry;
