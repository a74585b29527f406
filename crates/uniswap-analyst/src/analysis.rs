//! Analysis Agent
//!
//! Hands the raw subgraph result back to the LLM for a written answer.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider};
use serde_json::Value;

use crate::error::Result;
use crate::prompts::{SYSTEM_PROMPT, analysis_prompt};

/// Output token budget for the analysis
pub const ANALYSIS_MAX_TOKENS: u32 = 4000;

pub struct AnalysisAgent {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl AnalysisAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            options: GenerationOptions::new(model).max_tokens(ANALYSIS_MAX_TOKENS),
        }
    }

    /// Summarize `data` as an answer to `user_query`.
    pub async fn analyze(&self, user_query: &str, data: &Value) -> Result<String> {
        let data_json = serde_json::to_string_pretty(data)?;
        let prompt = analysis_prompt(user_query, &data_json);

        let completion = self
            .provider
            .ask(SYSTEM_PROMPT, &prompt, &self.options)
            .await?;

        if completion.truncated() {
            tracing::warn!(max_tokens = self.options.max_tokens, "Analysis hit the token budget");
        }
        Ok(completion.content)
    }
}
