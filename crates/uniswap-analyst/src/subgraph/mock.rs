//! Mock Subgraph Client
//!
//! For testing and demo purposes. Returns one canned response for every query.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::SubgraphClient;
use crate::error::{AnalystError, Result};

/// Mock subgraph client with a fixed outcome
pub struct MockSubgraphClient {
    outcome: std::result::Result<Value, String>,
    queries: Mutex<Vec<String>>,
}

impl MockSubgraphClient {
    /// Answer every query with `body`
    pub fn with_response(body: Value) -> Self {
        Self {
            outcome: Ok(body),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fail every query with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubgraphClient for MockSubgraphClient {
    async fn execute(&self, query: &str, _variables: Option<&Map<String, Value>>) -> Result<Value> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        self.outcome.clone().map_err(AnalystError::GraphQl)
    }

    fn endpoint(&self) -> &str {
        "mock://subgraph"
    }
}
