//! Request Pipeline
//!
//! Question → query generation → subgraph execution → analysis.

use std::sync::Arc;

use agent_core::LlmProvider;
use tracing::Instrument;

use crate::analysis::AnalysisAgent;
use crate::error::Result;
use crate::query::QueryAgent;
use crate::subgraph::SubgraphClient;

/// Shown to the user whenever any step of a request fails
pub const FAILURE_MESSAGE: &str =
    "Failed to process your query. Please try again with a different request.";

/// Runs one question through the full generate/execute/analyze flow
pub struct TokenAnalysisAgent {
    query_agent: QueryAgent,
    subgraph: Arc<dyn SubgraphClient>,
    analysis_agent: AnalysisAgent,
}

impl TokenAnalysisAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        subgraph: Arc<dyn SubgraphClient>,
        model: impl Into<String>,
    ) -> Self {
        let model = model.into();
        Self {
            query_agent: QueryAgent::new(provider.clone(), model.clone()),
            subgraph,
            analysis_agent: AnalysisAgent::new(provider, model),
        }
    }

    /// Process a question, returning the analysis or the typed error.
    pub async fn try_process_query(&self, user_query: &str) -> Result<String> {
        let span = tracing::info_span!("query", request_id = %uuid::Uuid::new_v4());
        async {
            let generated = self.query_agent.generate(user_query).await?;

            tracing::debug!(endpoint = self.subgraph.endpoint(), "Executing subgraph query");
            let data = self
                .subgraph
                .execute(&generated.query, generated.variables.as_ref())
                .await?;

            self.analysis_agent.analyze(user_query, &data).await
        }
        .instrument(span)
        .await
    }

    /// Process a question; every failure is logged and becomes [`FAILURE_MESSAGE`].
    pub async fn process_query(&self, user_query: &str) -> String {
        match self.try_process_query(user_query).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::error!(stage = e.stage(), error = %e, "Error processing query");
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}
