//! Prompt Templates
//!
//! Fixed persona, query-generation instructions (with the embedded Uniswap V3
//! subgraph schema) and the analysis template.

/// Uniswap V3 subgraph schema, as published by the subgraph authors
pub const SUBGRAPH_SCHEMA: &str = include_str!("schema.graphql");

/// System persona shared by the query and analysis calls
pub const SYSTEM_PROMPT: &str = r#"You are a DeFi and cryptocurrency expert specializing in Uniswap V3 token analysis.
You provide data-driven insights on tokens, pools, liquidity, and market trends.
Your analysis considers multiple factors including price, liquidity, volume, fees, and market conditions.
All data comes from the Uniswap V3 protocol on Ethereum.
When presenting data, include relevant metrics and brief observations.
Present all financial data in a clear, readable format with proper units."#;

/// Instruction block placed in front of the user's question
pub const QUERY_GENERATION_PROMPT: &str = concat!(
    "You are an expert in generating GraphQL queries based on a given schema. ",
    "Create precise and accurate queries using only the schema provided below. ",
    "Do not add any fields, entities, or relationships that are not explicitly defined in the schema. ",
    "The queries must be fully compliant with the schema and must not rely on assumptions or external information.\n\n",
    "Here is the schema:\n\n",
    include_str!("schema.graphql"),
    "\nBased on this schema, generate the query.\n",
    "Use symbol_contains for symbol comparisons.\n",
    "Return exactly one query inside a single ```graphql fenced code block.\n\n",
    "Question: ",
);

/// Build the query-generation prompt for a user question.
pub fn query_prompt(user_query: &str) -> String {
    format!("{QUERY_GENERATION_PROMPT}{user_query}")
}

/// Build the analysis prompt from the question and the pretty-printed result.
pub fn analysis_prompt(user_query: &str, data_json: &str) -> String {
    format!(
        "I need you to analyze this Uniswap V3 token data and respond to the user's query.\n\n\
         User Query: \"{user_query}\"\n\n\
         Data from Uniswap V3:\n{data_json}\n"
    )
}
