//! # agent-core
//!
//! Provider-agnostic LLM abstraction used by the Uniswap subgraph analyst.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    uniswap-analyst                       │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────┐  │
//! │  │ QueryAgent  │  │  Subgraph   │  │  AnalysisAgent   │  │
//! │  └──────┬──────┘  └─────────────┘  └────────┬─────────┘  │
//! │         └──────────────┬────────────────────┘            │
//! │                 ┌──────┴──────┐                          │
//! │                 │ LlmProvider │  (Strategy)              │
//! │                 └─────────────┘                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the agents run against Anthropic, Ollama,
//! or a scripted mock without changing agent logic.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
