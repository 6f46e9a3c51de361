//! Prompt construction for the master agent.
//!
//! Everything here is a pure function of its inputs: the registry snapshot
//! for the system prompt, the task for the user prompt, and the session
//! turns for the provider history.

use serde_json::{Map, Value};

use super::types::{ConversationTurn, Role, TaskContext};
use crate::capabilities::CapabilityDescriptor;
use crate::llms::base_llm::{ProviderRole, ProviderTurn};

const SYSTEM_PROMPT_PREAMBLE: &str = "\
You are a Master Agent orchestrating multiple specialized AI agents. Your role is to:
1. Understand and analyze incoming requests
2. Determine if a task should be delegated to a child agent
3. Coordinate responses and ensure quality";

const SYSTEM_PROMPT_CLOSING: &str = "\
When you identify a task that matches a child agent's capabilities, indicate in your response that the task should be delegated.";

/// Render one registry entry as a system prompt line.
pub fn descriptor_line(descriptor: &CapabilityDescriptor) -> String {
    format!(
        "- {}: {} (Capabilities: {})",
        descriptor.name,
        descriptor.description,
        descriptor.capabilities.join(", ")
    )
}

/// Build the master agent's system prompt, one line per child agent in
/// listing order.
pub fn build_system_prompt(descriptors: &[CapabilityDescriptor]) -> String {
    let child_agents = descriptors
        .iter()
        .map(descriptor_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nAvailable child agents:\n{}\n\n{}",
        SYSTEM_PROMPT_PREAMBLE, child_agents, SYSTEM_PROMPT_CLOSING
    )
}

/// Build the user prompt: task kind, parameters, and context metadata when
/// present. JSON blocks keep the caller's key order.
pub fn build_user_prompt(
    kind: &str,
    parameters: &Map<String, Value>,
    context: Option<&TaskContext>,
) -> Result<String, serde_json::Error> {
    let mut prompt = format!("Task Type: {}\n", kind);
    prompt.push_str(&format!(
        "Parameters: {}\n",
        serde_json::to_string_pretty(parameters)?
    ));

    if let Some(metadata) = context.and_then(|c| c.metadata.as_ref()) {
        prompt.push_str(&format!(
            "Additional Context: {}\n",
            serde_json::to_string_pretty(metadata)?
        ));
    }

    Ok(prompt)
}

/// Map a session role onto the provider's vocabulary.
pub fn provider_role(role: Role) -> ProviderRole {
    match role {
        Role::Assistant => ProviderRole::Model,
        Role::User => ProviderRole::User,
        Role::System => ProviderRole::System,
    }
}

/// Translate prior turns for the provider, preserving order.
pub fn translate_history(turns: &[ConversationTurn]) -> Vec<ProviderTurn> {
    turns
        .iter()
        .map(|turn| ProviderTurn::new(provider_role(turn.role), turn.content.clone()))
        .collect()
}
