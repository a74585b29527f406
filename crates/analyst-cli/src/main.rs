//! Uniswap V3 Subgraph Analyst
//!
//! Interactive CLI: type a question about Uniswap V3, get an analysis
//! backed by live subgraph data.

mod args;
mod repl;

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use uniswap_analyst::{HttpSubgraphClient, SubgraphClient, TokenAnalysisAgent};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before clap reads env-backed flags
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with answers on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let model = args.model();

    let provider = args.build_provider()?;
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to {} (model: {})", provider.name(), model),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - queries will fail", provider.name());
        }
    }

    let subgraph = Arc::new(HttpSubgraphClient::new(args.subgraph_config())?);
    tracing::info!("Subgraph endpoint: {}", subgraph.endpoint());

    let agent = TokenAnalysisAgent::new(provider, subgraph, model);

    if let Some(question) = &args.query {
        repl::answer_once(&agent, question, &mut tokio::io::stdout()).await?;
        return Ok(());
    }

    repl::run(&agent, BufReader::new(tokio::io::stdin()), &mut tokio::io::stdout()).await?;

    Ok(())
}
