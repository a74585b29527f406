//! # uniswap-analyst
//!
//! Answers natural-language questions about Uniswap V3 by letting an LLM
//! write a GraphQL query against the Uniswap V3 subgraph, running it, and
//! asking the LLM again to summarize the returned data.
//!
//! ## Request Flow
//!
//! ```text
//!  question ──► QueryAgent ──► SubgraphClient ──► AnalysisAgent ──► answer
//!               (LLM call,     (POST to the       (LLM call with
//!                ```graphql     subgraph)          raw JSON data)
//!                extraction)
//! ```
//!
//! Every step is stateless; a failure anywhere turns into
//! [`pipeline::FAILURE_MESSAGE`] at the [`TokenAnalysisAgent`] boundary.

pub mod analysis;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod subgraph;

pub use analysis::AnalysisAgent;
pub use error::{AnalystError, Result};
pub use pipeline::{FAILURE_MESSAGE, TokenAnalysisAgent};
pub use query::{GeneratedQuery, QueryAgent, extract_graphql_block};
pub use subgraph::{HttpSubgraphClient, MockSubgraphClient, SubgraphClient, SubgraphConfig};
