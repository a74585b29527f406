//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for all LLM providers (Anthropic, Ollama, mocks)
//! so the query and analysis agents work with any backend without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = AnthropicProvider::from_env()?;
//! let options = GenerationOptions::new("claude-3-7-sonnet-20250219").max_tokens(1000);
//! let completion = provider.ask(SYSTEM_PROMPT, "Top 5 pools by volume", &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Configuration for a single LLM generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "claude-3-7-sonnet-20250219", "llama3.2")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; `None` leaves the provider default in place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

const fn default_max_tokens() -> u32 {
    1024
}

impl GenerationOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }

    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Whether generation stopped because the token budget ran out.
    pub fn truncated(&self) -> bool {
        self.finish_reason == Some(FinishReason::Length)
    }
}

/// Token usage statistics
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub const fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    Other(String),
}

impl FinishReason {
    /// Normalize provider-specific stop reasons ("end_turn", "max_tokens", "stop", "length").
    pub fn parse(reason: &str) -> Self {
        match reason {
            "end_turn" | "stop" | "stop_sequence" => Self::Stop,
            "max_tokens" | "length" => Self::Length,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The agents work exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name, used in logs
    fn name(&self) -> &str;

    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(&self, messages: &[Message], options: &GenerationOptions)
        -> Result<Completion>;

    /// Single-turn completion with a fixed persona
    async fn ask(
        &self,
        system_prompt: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let messages = [Message::system(system_prompt), Message::user(prompt)];
        self.complete(&messages, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_builder() {
        let opts = GenerationOptions::new("claude-3-7-sonnet-20250219").max_tokens(4000);
        assert_eq!(opts.model, "claude-3-7-sonnet-20250219");
        assert_eq!(opts.max_tokens, 4000);
        assert!(opts.temperature.is_none());
    }

    #[test]
    fn test_generation_options_defaults_from_json() {
        let opts: GenerationOptions = serde_json::from_str(r#"{"model":"llama3.2"}"#).unwrap();
        assert_eq!(opts.max_tokens, 1024);
    }

    #[test]
    fn test_token_usage_total_saturates() {
        let usage = TokenUsage {
            prompt_tokens: u32::MAX,
            completion_tokens: 10,
        };
        assert_eq!(usage.total(), u32::MAX);

        let usage = TokenUsage {
            prompt_tokens: 1200,
            completion_tokens: 300,
        };
        assert_eq!(usage.total(), 1500);
    }

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse("end_turn"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("max_tokens"), FinishReason::Length);
        assert_eq!(
            FinishReason::parse("refusal"),
            FinishReason::Other("refusal".into())
        );
    }
}
