//! Error Types for the Subgraph Analyst

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalystError>;

#[derive(Error, Debug)]
pub enum AnalystError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] AgentError),

    #[error("No valid GraphQL query found in the LLM response")]
    NoQueryFound,

    #[error("Subgraph request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Subgraph returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Subgraph returned errors: {0}")]
    GraphQl(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalystError {
    /// Pipeline stage the error belongs to, for log fields
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Llm(_) => "llm",
            Self::NoQueryFound => "extraction",
            Self::Network(_) | Self::Http { .. } | Self::GraphQl(_) => "subgraph",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
        }
    }
}
