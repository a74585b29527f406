//! Mock LLM Provider
//!
//! Returns scripted responses in order. For tests and offline demos.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider},
};
use async_trait::async_trait;

/// A request the mock received
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

/// Scripted LLM provider
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful text reply
    #[must_use]
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.lock_script().push_back(Ok(text.into()));
        self
    }

    /// Queue a provider failure
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.lock_script().push_back(Err(message.into()));
        self
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<String, String>>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                messages: messages.to_vec(),
                options: options.clone(),
            });

        match self.lock_script().pop_front() {
            Some(Ok(content)) => Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            }),
            Some(Err(message)) => Err(AgentError::Provider(message)),
            None => Err(AgentError::ProviderUnavailable("no scripted response left".into())),
        }
    }
}
