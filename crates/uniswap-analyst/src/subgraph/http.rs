//! HTTP Subgraph Client

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{SubgraphClient, SubgraphConfig};
use crate::error::{AnalystError, Result};

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Map<String, Value>>,
}

/// Posts queries to a GraphQL endpoint over HTTP
pub struct HttpSubgraphClient {
    client: reqwest::Client,
    config: SubgraphConfig,
}

impl HttpSubgraphClient {
    pub fn new(config: SubgraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalystError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SubgraphConfig::from_env())
    }
}

/// Error messages of a response that carries `errors` but no `data`.
fn graphql_failure(body: &Value) -> Option<String> {
    let errors = body.get("errors").filter(|e| !e.is_null())?;
    if body.get("data").is_some_and(|d| !d.is_null()) {
        return None;
    }

    let messages: Vec<&str> = errors
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    Some(if messages.is_empty() {
        errors.to_string()
    } else {
        messages.join("; ")
    })
}

#[async_trait]
impl SubgraphClient for HttpSubgraphClient {
    async fn execute(&self, query: &str, variables: Option<&Map<String, Value>>) -> Result<Value> {
        let mut request = self
            .client
            .post(&self.config.url)
            .json(&GraphQlRequest { query, variables });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        if let Some(message) = graphql_failure(&body) {
            return Err(AnalystError::GraphQl(message));
        }
        if body.get("errors").is_some_and(|e| !e.is_null()) {
            tracing::warn!(errors = %body["errors"], "Subgraph returned partial data with errors");
        }

        Ok(body)
    }

    fn endpoint(&self) -> &str {
        &self.config.url
    }
}
