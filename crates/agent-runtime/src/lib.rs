//! # agent-runtime
//!
//! Runtime providers for the subgraph analyst.
//!
//! ## Providers
//!
//! - **Anthropic** (default): Claude via the Messages API
//! - **Ollama** (`ollama` feature): local inference via Ollama
//! - **Mock**: scripted responses for tests and offline demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::AnthropicProvider;
//!
//! let provider = Arc::new(AnthropicProvider::from_env()?);
//! let agent = TokenAnalysisAgent::new(provider, subgraph, model);
//! ```

pub mod anthropic;
pub mod mock;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use mock::MockProvider;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, Message, Result, Role};
