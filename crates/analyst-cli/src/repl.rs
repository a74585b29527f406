//! Interactive Query Loop

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use uniswap_analyst::TokenAnalysisAgent;

pub const WELCOME: &str = r#"Welcome to the Uniswap Token Analysis Agent!
Enter your query or type "exit" to quit.
Example queries:
- "Get details of the USDC/ETH pool on Uniswap V3."
- "Show the price of ETH/USDC over the last 7 days."
- "What are the most actively traded pools?"
"#;

const PROMPT: &[u8] = b"\nQuery: ";

/// What to do with one line of input
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Blank,
    Query(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Self::Blank
        } else if line.eq_ignore_ascii_case("exit") {
            Self::Exit
        } else {
            Self::Query(line)
        }
    }
}

/// Answer a single question on `output`, without the banner or prompt.
pub async fn answer_once<W>(agent: &TokenAnalysisAgent, question: &str, output: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let analysis = agent.process_query(question).await;
    output.write_all(format!("{analysis}\n").as_bytes()).await?;
    output.flush().await
}

/// Read questions from `input` until `exit` or EOF, answering each on `output`.
pub async fn run<R, W>(agent: &TokenAnalysisAgent, input: R, output: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(WELCOME.as_bytes()).await?;
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\nGoodbye!\n").await?;
            break;
        };

        match Command::parse(&line) {
            Command::Exit => {
                output.write_all(b"Goodbye!\n").await?;
                break;
            }
            Command::Blank => continue,
            Command::Query(query) => {
                output.write_all(b"\nProcessing your query...\n").await?;
                output.flush().await?;

                let analysis = agent.process_query(query).await;
                output.write_all(format!("\n{analysis}\n").as_bytes()).await?;
            }
        }
    }

    output.flush().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_runtime::MockProvider;
    use serde_json::json;
    use uniswap_analyst::{
        FAILURE_MESSAGE, HttpSubgraphClient, MockSubgraphClient, SubgraphConfig,
    };

    use super::*;

    const POOLS_REPLY: &str =
        "```graphql\n{ pools(first: 5, orderBy: volumeUSD, orderDirection: desc) { id volumeUSD } }\n```";

    async fn run_script(agent: &TokenAnalysisAgent, script: &str) -> String {
        let mut output = Vec::new();
        run(agent, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("Exit"), Command::Exit);
        assert_eq!(Command::parse("EXIT"), Command::Exit);
        assert_eq!(Command::parse("  exit \r"), Command::Exit);
        assert_eq!(Command::parse("   "), Command::Blank);
        assert_eq!(Command::parse("exit now"), Command::Query("exit now"));
        assert_eq!(Command::parse(" Top pools "), Command::Query("Top pools"));
    }

    #[tokio::test]
    async fn test_exit_stops_without_processing() {
        for word in ["exit", "Exit", "EXIT"] {
            let provider = Arc::new(MockProvider::new());
            let subgraph = Arc::new(MockSubgraphClient::with_response(json!({})));
            let agent = TokenAnalysisAgent::new(provider.clone(), subgraph.clone(), "test-model");

            let output = run_script(&agent, &format!("{word}\nTop pools\n")).await;

            assert!(output.starts_with(WELCOME));
            assert!(output.ends_with("Goodbye!\n"));
            assert!(!output.contains("Processing your query"));
            assert!(provider.requests().is_empty());
            assert!(subgraph.queries().is_empty());
        }
    }

    #[tokio::test]
    async fn test_executor_failure_keeps_loop_running() {
        let provider = Arc::new(MockProvider::new().respond(POOLS_REPLY));
        let subgraph = Arc::new(MockSubgraphClient::failing("simulated outage"));
        let agent = TokenAnalysisAgent::new(provider, subgraph.clone(), "test-model");

        let output = run_script(&agent, "Show me the top 5 pools by volume\nexit\n").await;

        assert!(!subgraph.queries()[0].is_empty());
        let after_failure = output
            .split_once(FAILURE_MESSAGE)
            .map(|(_, rest)| rest)
            .unwrap();
        assert!(after_failure.contains("Query: "));
        assert!(after_failure.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        let provider = Arc::new(
            MockProvider::new()
                .respond(POOLS_REPLY)
                .respond(POOLS_REPLY),
        );
        let subgraph = Arc::new(
            HttpSubgraphClient::new(SubgraphConfig {
                url: "http://127.0.0.1:1/graphql".into(),
                api_key: None,
                timeout_secs: 5,
            })
            .unwrap(),
        );
        let agent = TokenAnalysisAgent::new(provider, subgraph, "test-model");

        let output = run_script(&agent, "Top pools\nTop tokens\n").await;

        assert_eq!(output.matches(FAILURE_MESSAGE).count(), 2);
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_answer_once_prints_only_the_analysis() {
        let provider = Arc::new(
            MockProvider::new()
                .respond(POOLS_REPLY)
                .respond("Pool 0x88e6 leads with $1.2B volume."),
        );
        let subgraph = Arc::new(MockSubgraphClient::with_response(
            json!({"data": {"pools": [{"id": "0x88e6", "volumeUSD": "1200000000"}]}}),
        ));
        let agent = TokenAnalysisAgent::new(provider.clone(), subgraph, "test-model");

        let mut output = Vec::new();
        answer_once(&agent, "Top pools", &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(output, "Pool 0x88e6 leads with $1.2B volume.\n");
        assert!(!output.contains("Welcome"));
        assert!(!output.contains("Query: "));
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_answer_once_reports_failure() {
        let provider = Arc::new(MockProvider::new().respond("no query here"));
        let subgraph = Arc::new(MockSubgraphClient::with_response(json!({})));
        let agent = TokenAnalysisAgent::new(provider, subgraph.clone(), "test-model");

        let mut output = Vec::new();
        answer_once(&agent, "Tell me a joke", &mut output).await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), format!("{FAILURE_MESSAGE}\n"));
        assert!(subgraph.queries().is_empty());
    }

    #[tokio::test]
    async fn test_answers_and_skips_blank_lines() {
        let provider = Arc::new(
            MockProvider::new()
                .respond(POOLS_REPLY)
                .respond("Pool 0x88e6 leads with $1.2B volume."),
        );
        let subgraph = Arc::new(MockSubgraphClient::with_response(
            json!({"data": {"pools": [{"id": "0x88e6", "volumeUSD": "1200000000"}]}}),
        ));
        let agent = TokenAnalysisAgent::new(provider.clone(), subgraph, "test-model");

        let output = run_script(&agent, "\n   \nTop pools\nexit\n").await;

        assert!(output.contains("\nPool 0x88e6 leads with $1.2B volume.\n"));
        assert_eq!(output.matches("Processing your query...").count(), 1);
        assert_eq!(provider.requests().len(), 2);
    }
}
