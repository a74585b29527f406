//! Anthropic LLM Provider
//!
//! Implementation of `LlmProvider` for the Anthropic Messages API.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role, split_system},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Anthropic provider configuration
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`
    pub api_key: String,

    /// API base URL (overridable for proxies and tests)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 120,
        }
    }

    /// Read `ANTHROPIC_API_KEY` and `ANTHROPIC_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("ANTHROPIC_API_KEY is not set".into()))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Anthropic LLM provider
pub struct AnthropicProvider {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create from configuration
    pub fn from_config(config: AnthropicConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(AnthropicConfig::from_env()?)
    }

    fn build_request<'a>(messages: &'a [Message], options: &'a GenerationOptions) -> MessagesRequest<'a> {
        let (system, turns) = split_system(messages);
        MessagesRequest {
            model: &options.model,
            max_tokens: options.max_tokens,
            system,
            messages: turns
                .into_iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
        }
    }

    /// Convert an API response to a completion; the first content block must be text.
    fn convert_response(response: MessagesResponse) -> Result<Completion> {
        let text = match response.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => text,
            Some(ContentBlock::Other) => {
                return Err(AgentError::UnexpectedResponse(
                    "expected a text content block".into(),
                ));
            }
            None => return Err(AgentError::UnexpectedResponse("empty content".into())),
        };

        Ok(Completion {
            content: text,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
            }),
            finish_reason: response.stop_reason.as_deref().map(FinishReason::parse),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "Anthropic"
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.config.endpoint("/v1/models"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .send()
            .await;

        match response {
            Ok(r) => Ok(r.status().is_success()),
            Err(e) => {
                tracing::warn!("Anthropic health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options);

        tracing::debug!(model = %options.model, max_tokens = options.max_tokens, "Sending Anthropic request");

        let response = self
            .client
            .post(self.config.endpoint("/v1/messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |e| e.error.message);
            return Err(AgentError::from_status(status.as_u16(), detail));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("invalid response body: {e}")))?;

        let completion = Self::convert_response(body)?;
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Anthropic usage"
            );
        }
        Ok(completion)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> AnthropicProvider {
        let config = AnthropicConfig::new("test-key").with_base_url(server.uri());
        AnthropicProvider::from_config(config).unwrap()
    }

    fn text_response(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": DEFAULT_MODEL,
            "content": [{"type": "text", "text": text}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 34}
        })
    }

    #[test]
    fn test_request_moves_persona_to_system_field() {
        let messages = vec![Message::system("You are a DeFi expert."), Message::user("Top pools")];
        let options = GenerationOptions::new(DEFAULT_MODEL).max_tokens(1000);
        let request = serde_json::to_value(AnthropicProvider::build_request(&messages, &options)).unwrap();

        assert_eq!(request["system"], "You are a DeFi expert.");
        assert_eq!(request["max_tokens"], 1000);
        assert_eq!(request["messages"], json!([{"role": "user", "content": "Top pools"}]));
        assert!(request.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_complete_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", API_VERSION))
            .and(body_partial_json(json!({"model": DEFAULT_MODEL, "system": "persona"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("hello")))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let completion = provider
            .ask("persona", "hi", &GenerationOptions::new(DEFAULT_MODEL))
            .await
            .unwrap();

        assert_eq!(completion.content, "hello");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.map(|u| u.total()), Some(46));
    }

    #[tokio::test]
    async fn test_non_text_block_is_rejected() {
        let server = MockServer::start().await;
        let body = json!({
            "model": DEFAULT_MODEL,
            "content": [{"type": "tool_use", "id": "t1", "name": "x", "input": {}}],
            "stop_reason": "tool_use"
        });
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .ask("persona", "hi", &GenerationOptions::new(DEFAULT_MODEL))
            .await;
        assert!(matches!(result, Err(AgentError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_auth_failure_carries_api_message() {
        let server = MockServer::start().await;
        let body = json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        });
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(body))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .ask("persona", "hi", &GenerationOptions::new(DEFAULT_MODEL))
            .await
            .unwrap_err();
        match err {
            AgentError::Auth(msg) => assert_eq!(msg, "invalid x-api-key"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        assert!(provider_for(&server).health_check().await.unwrap());
    }
}
