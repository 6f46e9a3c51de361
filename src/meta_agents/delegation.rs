//! Keyword-based delegation classifier.
//!
//! A task counts as delegated to the first child agent (in registry order)
//! for which any of these holds, compared case-insensitively:
//!
//! - one of its capability tags is a substring of the task kind
//! - one of its capability tags is a substring of the model reply
//! - its name is a substring of the model reply
//!
//! Matching is literal substring search. Short or common tags match
//! liberally (a tag like `data` hits most replies that mention data);
//! callers that need precision should register specific tags.

use serde::{Deserialize, Serialize};

use crate::capabilities::CapabilityDescriptor;

/// Which condition selected the child agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum MatchKind {
    /// A capability tag appeared in the task kind.
    TaskTypeTag(String),
    /// A capability tag appeared in the model reply.
    ResponseTag(String),
    /// The agent's name appeared in the model reply.
    ResponseName,
}

/// A positive delegation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationDecision {
    /// Name of the selected child agent.
    pub target: String,
    /// Human-readable justification.
    pub reason: String,
    /// The condition that matched.
    pub matched: MatchKind,
}

/// Classify a reply against the child agents, first match wins.
///
/// Returns `None` when no agent matches; that is a normal outcome.
pub fn analyze_for_delegation(
    response: &str,
    task_type: &str,
    descriptors: &[CapabilityDescriptor],
) -> Option<DelegationDecision> {
    let lower_response = response.to_lowercase();
    let lower_task_type = task_type.to_lowercase();

    descriptors.iter().find_map(|descriptor| {
        match_descriptor(&lower_response, &lower_task_type, descriptor).map(|matched| {
            DelegationDecision {
                target: descriptor.name.clone(),
                reason: format!("Task matches {} capabilities", descriptor.name),
                matched,
            }
        })
    })
}

fn match_descriptor(
    lower_response: &str,
    lower_task_type: &str,
    descriptor: &CapabilityDescriptor,
) -> Option<MatchKind> {
    for tag in &descriptor.capabilities {
        if lower_task_type.contains(tag.as_str()) {
            return Some(MatchKind::TaskTypeTag(tag.clone()));
        }
        if lower_response.contains(tag.as_str()) {
            return Some(MatchKind::ResponseTag(tag.clone()));
        }
    }

    if lower_response.contains(&descriptor.name.to_lowercase()) {
        return Some(MatchKind::ResponseName);
    }

    None
}
