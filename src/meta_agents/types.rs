//! Request and result types for the master agent.
//!
//! Dynamic payloads (task parameters, context metadata) stay as ordered
//! JSON maps so the order the caller sent is the order the model sees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One prior message in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
            metadata: None,
        }
    }
}

/// Session context attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContext {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl TaskContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: None,
            conversation_history: Vec::new(),
            metadata: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Task request
// ---------------------------------------------------------------------------

/// A task handed to the master agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Free-form task kind, e.g. `chat` or `code_generation`.
    #[serde(rename = "taskType")]
    pub kind: String,
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TaskContext>,
}

impl TaskRequest {
    pub fn new(kind: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            parameters,
            context: None,
        }
    }

    /// Builder: attach session context.
    pub fn with_context(mut self, context: TaskContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Prior turns, empty when there is no context.
    pub fn history(&self) -> &[ConversationTurn] {
        self.context
            .as_ref()
            .map(|c| c.conversation_history.as_slice())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of one orchestration call.
///
/// Callers distinguish success from failure by `succeeded` (`success` on
/// the wire) and `error`; `message`/`data` are only set on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    #[serde(rename = "success")]
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrchestrationResult {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            succeeded: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Name of the child agent the task was delegated to, if any.
    pub fn delegated_to(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.get("delegatedTo"))
            .and_then(|v| v.as_str())
    }
}
