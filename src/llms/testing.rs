//! In-memory providers for tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::base_llm::{BaseLLM, CompletionRequest, LlmError};

/// Returns a fixed reply and records every request it receives.
#[derive(Debug, Default)]
pub struct StubLLM {
    pub reply: String,
    pub seen: Mutex<Vec<CompletionRequest>>,
}

impl StubLLM {
    pub fn replying(reply: &str) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BaseLLM for StubLLM {
    fn model(&self) -> &str {
        "stub-model"
    }

    fn provider(&self) -> &str {
        "stub"
    }

    async fn acall(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.seen.lock().push(request);
        Ok(self.reply.clone())
    }
}

/// Fails every call with a rate-limit error.
#[derive(Debug)]
pub struct FailingLLM;

#[async_trait]
impl BaseLLM for FailingLLM {
    fn model(&self) -> &str {
        "failing-model"
    }

    fn provider(&self) -> &str {
        "stub"
    }

    async fn acall(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Api {
            provider: "stub".to_string(),
            status: 429,
            body: "rate limited".to_string(),
        })
    }
}
