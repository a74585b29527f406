//! Subgraph Integration
//!
//! Executes GraphQL queries against the Uniswap V3 subgraph.

mod http;
mod mock;

pub use http::HttpSubgraphClient;
pub use mock::MockSubgraphClient;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

/// Uniswap V3 (Ethereum mainnet) subgraph on The Graph's decentralized network
pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://gateway.thegraph.com/api/subgraphs/id/5zvR82QoaXYFyDEKLZ9t6v9adgnptxYpKpSbxtgVENFV";

/// Subgraph client trait (Strategy pattern)
#[async_trait]
pub trait SubgraphClient: Send + Sync {
    /// Run `query` and return the parsed JSON response body
    async fn execute(&self, query: &str, variables: Option<&Map<String, Value>>) -> Result<Value>;

    /// Endpoint the client talks to, for logs
    fn endpoint(&self) -> &str;
}

/// Subgraph endpoint configuration
#[derive(Clone, Debug)]
pub struct SubgraphConfig {
    /// GraphQL endpoint URL
    pub url: String,

    /// Bearer token for The Graph gateway
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SUBGRAPH_URL.into(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl SubgraphConfig {
    /// Read `SUBGRAPH_URL` and `THEGRAPH_API_KEY`.
    pub fn from_env() -> Self {
        let url = std::env::var("SUBGRAPH_URL").unwrap_or_else(|_| DEFAULT_SUBGRAPH_URL.into());
        let api_key = std::env::var("THEGRAPH_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self {
            url,
            api_key,
            ..Default::default()
        }
    }
}
