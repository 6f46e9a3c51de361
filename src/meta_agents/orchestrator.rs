//! Prompt orchestrator — the master agent's single decision loop.
//!
//! For every task: snapshot the registry, build the system and user
//! prompts, ask the completion provider once, then classify the reply for
//! delegation. No retry, no caching; a failed call is a failed result.

use std::fmt;
use std::sync::Arc;

use serde_json::json;

use super::delegation::analyze_for_delegation;
use super::prompts::{build_system_prompt, build_user_prompt, translate_history};
use super::types::{OrchestrationResult, TaskRequest};
use crate::capabilities::{CapabilityDescriptor, DescriptorRegistry};
use crate::llms::base_llm::{BaseLLM, CompletionRequest};
use crate::utilities::errors::OrchestratorError;

/// Identifier reported in `processedBy` when no child agent matches.
pub const ORCHESTRATOR_NAME: &str = "MasterAgent";

/// The master agent.
///
/// Cheap to share behind an `Arc`; `handle` takes `&self` and may run on
/// many tasks at once.
#[derive(Clone)]
pub struct PromptOrchestrator {
    llm: Arc<dyn BaseLLM>,
    registry: Arc<DescriptorRegistry>,
}

impl PromptOrchestrator {
    /// Create an orchestrator over an existing registry.
    pub fn new(llm: Arc<dyn BaseLLM>, registry: Arc<DescriptorRegistry>) -> Self {
        Self { llm, registry }
    }

    /// Create an orchestrator with the three built-in child agents.
    pub fn with_default_agents(llm: Arc<dyn BaseLLM>) -> Self {
        Self::new(llm, Arc::new(DescriptorRegistry::with_defaults()))
    }

    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        &self.registry
    }

    /// Model identifier of the completion provider.
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Add or replace a child agent; takes effect on the next task.
    pub fn register_child_agent(
        &self,
        descriptor: CapabilityDescriptor,
    ) -> Result<(), OrchestratorError> {
        self.registry.register(descriptor)
    }

    /// All child agents in registry order.
    pub fn child_agents(&self) -> Vec<CapabilityDescriptor> {
        self.registry.list()
    }

    /// Process one task.
    ///
    /// Never fails: provider errors come back as a result with
    /// `succeeded == false` and a non-empty `error`.
    pub async fn handle(&self, request: TaskRequest) -> OrchestrationResult {
        match self.try_handle(&request).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Error processing {} task: {}", request.kind, e);
                let message = e.to_string();
                if message.is_empty() {
                    OrchestrationResult::failure("Unknown error occurred")
                } else {
                    OrchestrationResult::failure(message)
                }
            }
        }
    }

    async fn try_handle(
        &self,
        request: &TaskRequest,
    ) -> Result<OrchestrationResult, OrchestratorError> {
        // One snapshot for both prompt and classification, taken before
        // the await so concurrent registrations never block on us.
        let descriptors = self.registry.list();

        let completion = CompletionRequest {
            system_instruction: build_system_prompt(&descriptors),
            history: translate_history(request.history()),
            prompt: build_user_prompt(
                &request.kind,
                &request.parameters,
                request.context.as_ref(),
            )?,
        };

        log::debug!(
            "Dispatching {} task to {} ({} prior turns)",
            request.kind,
            self.llm.model(),
            completion.history.len()
        );

        let text = self.llm.acall(completion).await?;

        match analyze_for_delegation(&text, &request.kind, &descriptors) {
            Some(decision) => {
                log::debug!(
                    "Task {} delegated to {} via {:?}",
                    request.kind,
                    decision.target,
                    decision.matched
                );
                Ok(OrchestrationResult::success(
                    format!("Task delegated to {}", decision.target),
                    json!({
                        "delegatedTo": decision.target,
                        "reason": decision.reason,
                        "originalResponse": text,
                    }),
                ))
            }
            None => Ok(OrchestrationResult::success(
                text,
                json!({
                    "taskType": request.kind,
                    "processedBy": ORCHESTRATOR_NAME,
                }),
            )),
        }
    }
}

impl fmt::Debug for PromptOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptOrchestrator")
            .field("model", &self.llm.model())
            .field("child_agents", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::base_llm::ProviderRole;
    use crate::llms::testing::{FailingLLM, StubLLM};
    use crate::meta_agents::types::{ConversationTurn, Role, TaskContext};
    use serde_json::Map;

    fn registry_of(descriptors: Vec<CapabilityDescriptor>) -> Arc<DescriptorRegistry> {
        let registry = DescriptorRegistry::new();
        for descriptor in descriptors {
            registry.register(descriptor).unwrap();
        }
        Arc::new(registry)
    }

    fn task(kind: &str) -> TaskRequest {
        TaskRequest::new(kind, Map::new())
    }

    #[tokio::test]
    async fn test_delegates_on_task_type_tag() {
        let registry = registry_of(vec![
            CapabilityDescriptor::new("A", "agent a", &["x"], ""),
            CapabilityDescriptor::new("B", "agent b", &["y"], ""),
        ]);
        let orchestrator = PromptOrchestrator::new(StubLLM::replying("done"), registry);

        let result = orchestrator.handle(task("x-task")).await;

        assert!(result.succeeded);
        assert_eq!(result.message.as_deref(), Some("Task delegated to A"));
        assert_eq!(result.delegated_to(), Some("A"));
        let data = result.data.unwrap();
        assert!(data["reason"].as_str().unwrap().contains('A'));
        assert_eq!(data["originalResponse"], "done");
    }

    #[tokio::test]
    async fn test_no_match_returns_reply() {
        let orchestrator =
            PromptOrchestrator::with_default_agents(StubLLM::replying("Here is a poem about the sea"));

        let result = orchestrator.handle(task("general_chat")).await;

        assert!(result.succeeded);
        assert_eq!(result.message.as_deref(), Some("Here is a poem about the sea"));
        assert_eq!(result.delegated_to(), None);
        assert_eq!(
            result.data.unwrap(),
            json!({ "taskType": "general_chat", "processedBy": "MasterAgent" })
        );
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let orchestrator = PromptOrchestrator::with_default_agents(StubLLM::replying("pong"));
        let result = orchestrator.handle(task("ping")).await;

        assert!(result.succeeded);
        assert!(result.message.as_deref().unwrap().contains("pong"));
        assert_eq!(result.delegated_to(), None);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_failed_result() {
        let orchestrator = PromptOrchestrator::with_default_agents(Arc::new(FailingLLM));
        let result = orchestrator.handle(task("code_generation")).await;

        assert!(!result.succeeded);
        assert!(result.message.is_none());
        assert!(result.data.is_none());
        let error = result.error.unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("429"));
    }

    #[tokio::test]
    async fn test_handle_is_deterministic() {
        let stub = StubLLM::replying("Consider debugging the loop");
        let orchestrator = PromptOrchestrator::with_default_agents(stub.clone());

        let mut parameters = Map::new();
        parameters.insert("code".to_string(), json!("for i in 0..n {}"));
        let request = TaskRequest::new("review", parameters);

        let first = orchestrator.handle(request.clone()).await;
        let second = orchestrator.handle(request).await;
        assert_eq!(first, second);

        let seen = stub.seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn test_completion_request_contents() {
        let stub = StubLLM::replying("ok");
        let orchestrator = PromptOrchestrator::with_default_agents(stub.clone());

        let mut context = TaskContext::new("session-1");
        context.conversation_history = vec![
            ConversationTurn::new(Role::User, "hi"),
            ConversationTurn::new(Role::Assistant, "hello"),
        ];
        context.metadata = json!({ "channel": "web" }).as_object().cloned();

        let mut parameters = Map::new();
        parameters.insert("message".to_string(), json!("how are you?"));
        let request = TaskRequest::new("chat", parameters).with_context(context);

        orchestrator.handle(request).await;

        let seen = stub.seen.lock();
        let sent = &seen[0];
        assert!(sent
            .system_instruction
            .contains("- DataAnalysisAgent: Handles data analysis and processing tasks (Capabilities: data_analysis, statistics, visualization)"));
        assert!(sent.prompt.starts_with("Task Type: chat\nParameters: {\n  \"message\": \"how are you?\"\n}\n"));
        assert!(sent.prompt.contains("Additional Context:"));
        assert_eq!(sent.history.len(), 2);
        assert_eq!(sent.history[1].role, ProviderRole::Model);
    }

    #[tokio::test]
    async fn test_runtime_registration_affects_next_task() {
        let orchestrator = PromptOrchestrator::with_default_agents(StubLLM::replying("pong"));
        assert!(orchestrator.handle(task("ping")).await.delegated_to().is_none());

        orchestrator
            .register_child_agent(CapabilityDescriptor::new("PingAgent", "answers pings", &["ping"], ""))
            .unwrap();

        let result = orchestrator.handle(task("ping")).await;
        assert_eq!(result.delegated_to(), Some("PingAgent"));
        assert_eq!(orchestrator.child_agents().len(), 4);
    }

    #[test]
    fn test_register_empty_name_rejected() {
        let orchestrator = PromptOrchestrator::with_default_agents(StubLLM::replying(""));
        let err = orchestrator
            .register_child_agent(CapabilityDescriptor::new("", "nameless", &["n"], ""))
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        assert_eq!(orchestrator.child_agents().len(), 3);
    }

    #[test]
    fn test_orchestrator_debug() {
        let orchestrator = PromptOrchestrator::with_default_agents(StubLLM::replying(""));
        let debug = format!("{:?}", orchestrator);
        assert!(debug.contains("stub-model"));
        assert!(debug.contains('3'));
    }
}
