//! Query Agent
//!
//! Asks the LLM to translate a question into a GraphQL query and pulls the
//! query out of the first ```graphql fenced block of the reply.

use std::sync::{Arc, LazyLock};

use agent_core::{GenerationOptions, LlmProvider};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AnalystError, Result};
use crate::prompts::{SYSTEM_PROMPT, query_prompt};

/// Output token budget for query generation
pub const QUERY_MAX_TOKENS: u32 = 1000;

static GRAPHQL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```graphql([\s\S]*?)```").expect("valid fence pattern"));

/// A GraphQL query produced by the LLM
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl GeneratedQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// Extract the body of the first ```graphql fenced block, trimmed.
///
/// Returns `None` when there is no such block or the block is blank.
pub fn extract_graphql_block(text: &str) -> Option<String> {
    let body = GRAPHQL_BLOCK.captures(text)?.get(1)?.as_str().trim();
    (!body.is_empty()).then(|| body.to_string())
}

/// Turns user questions into subgraph queries
pub struct QueryAgent {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl QueryAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            options: GenerationOptions::new(model).max_tokens(QUERY_MAX_TOKENS),
        }
    }

    /// Generate a query for `user_query`.
    ///
    /// Fails with [`AnalystError::Llm`] when the provider call fails and with
    /// [`AnalystError::NoQueryFound`] when the reply carries no usable block.
    /// The query is not validated; a bad query surfaces at execution time.
    pub async fn generate(&self, user_query: &str) -> Result<GeneratedQuery> {
        let prompt = query_prompt(user_query);
        let completion = self
            .provider
            .ask(SYSTEM_PROMPT, &prompt, &self.options)
            .await?;

        if completion.truncated() {
            tracing::warn!(
                max_tokens = self.options.max_tokens,
                "Query generation hit the token budget"
            );
        }

        let query = extract_graphql_block(&completion.content).ok_or_else(|| {
            tracing::debug!(response = %completion.content, "No graphql block in LLM response");
            AnalystError::NoQueryFound
        })?;

        tracing::info!(query = %query, "Generated GraphQL query");
        Ok(GeneratedQuery::new(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Role;
    use agent_runtime::MockProvider;

    #[test]
    fn test_extract_trims_fence_and_whitespace() {
        let reply = "Here you go:\n```graphql\n  query {\n    pools(first: 5) { id }\n  }\n```\nDone.";
        assert_eq!(
            extract_graphql_block(reply).as_deref(),
            Some("query {\n    pools(first: 5) { id }\n  }")
        );
    }

    #[test]
    fn test_extract_takes_first_block() {
        let reply = "```graphql\n{ bundles { id } }\n```\nor\n```graphql\n{ factories { id } }\n```";
        assert_eq!(extract_graphql_block(reply).as_deref(), Some("{ bundles { id } }"));
    }

    #[test]
    fn test_extract_without_block() {
        assert_eq!(extract_graphql_block("query { pools { id } }"), None);
        assert_eq!(extract_graphql_block("```json\n{\"a\": 1}\n```"), None);
        assert_eq!(extract_graphql_block("```graphql\n{ pools { id } }"), None);
        assert_eq!(extract_graphql_block(""), None);
    }

    #[test]
    fn test_extract_blank_block() {
        assert_eq!(extract_graphql_block("```graphql\n   \n```"), None);
    }

    #[tokio::test]
    async fn test_generate_sends_schema_prompt() {
        let provider = Arc::new(
            MockProvider::new().respond("```graphql\n{ pools(first: 5) { id } }\n```"),
        );
        let agent = QueryAgent::new(provider.clone(), "test-model");

        let generated = agent.generate("Top 5 pools").await.unwrap();
        assert_eq!(generated, GeneratedQuery::new("{ pools(first: 5) { id } }"));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.options.max_tokens, QUERY_MAX_TOKENS);
        assert_eq!(request.options.model, "test-model");
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert!(request.messages[1].content.contains("type PoolDayData"));
        assert!(request.messages[1].content.ends_with("Top 5 pools"));
    }

    #[tokio::test]
    async fn test_generate_without_block_fails() {
        let provider = Arc::new(MockProvider::new().respond("I cannot answer that."));
        let agent = QueryAgent::new(provider, "test-model");

        let result = agent.generate("What is the weather?").await;
        assert!(matches!(result, Err(AnalystError::NoQueryFound)));
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_error() {
        let provider = Arc::new(MockProvider::new().fail("overloaded"));
        let agent = QueryAgent::new(provider, "test-model");

        let result = agent.generate("Top pools").await;
        assert!(matches!(result, Err(AnalystError::Llm(_))));
    }
}
