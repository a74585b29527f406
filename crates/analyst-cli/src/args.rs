//! Command-line Arguments

use std::sync::Arc;

use agent_core::LlmProvider;
use agent_runtime::{AnthropicProvider, OllamaProvider, anthropic, ollama};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use uniswap_analyst::SubgraphConfig;

/// LLM backend selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Anthropic,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(version, about = "Ask questions about Uniswap V3 on-chain data in plain English")]
pub struct Args {
    /// LLM backend
    #[arg(long, env = "LLM_PROVIDER", value_enum, default_value_t = ProviderKind::Anthropic)]
    pub provider: ProviderKind,

    /// Model identifier (defaults to the provider's default model)
    #[arg(long, env = "LLM_MODEL")]
    pub model: Option<String>,

    /// Subgraph GraphQL endpoint
    #[arg(long, env = "SUBGRAPH_URL")]
    pub endpoint: Option<String>,

    /// Answer a single question and exit
    #[arg(short, long, value_name = "QUESTION")]
    pub query: Option<String>,
}

impl Args {
    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            match self.provider {
                ProviderKind::Anthropic => anthropic::DEFAULT_MODEL,
                ProviderKind::Ollama => ollama::DEFAULT_MODEL,
            }
            .to_string()
        })
    }

    pub fn build_provider(&self) -> anyhow::Result<Arc<dyn LlmProvider>> {
        Ok(match self.provider {
            ProviderKind::Anthropic => Arc::new(
                AnthropicProvider::from_env().context("failed to configure the Anthropic provider")?,
            ),
            ProviderKind::Ollama => Arc::new(OllamaProvider::from_env()),
        })
    }

    pub fn subgraph_config(&self) -> SubgraphConfig {
        let mut config = SubgraphConfig::from_env();
        if let Some(endpoint) = &self.endpoint {
            config.url.clone_from(endpoint);
        }
        config
    }
}
