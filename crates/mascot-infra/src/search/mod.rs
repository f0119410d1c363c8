//! Web search tool backed by the Google Custom Search API.
//!
//! The single capability this deployment advertises to the model. Failures
//! are soft by design: network errors and empty result sets come back as
//! readable text in the tool output so the model can tell the user instead
//! of the request dying.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use mascot_core::tool::Tool;
use mascot_types::llm::ToolOutput;

/// Function name advertised to the model.
pub const WEB_SEARCH_TOOL_NAME: &str = "web_search";

/// Response body for `customsearch/v1`.
#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// One search hit.
#[derive(Debug, Clone, Default, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

/// Google Custom Search as a model-invokable tool.
pub struct GoogleSearchTool {
    client: reqwest::Client,
    api_key: SecretString,
    engine_id: String,
    base_url: String,
    max_results: u32,
}

impl GoogleSearchTool {
    /// Create a new search tool.
    ///
    /// `engine_id` is the custom search engine id (`cx`).
    pub fn new(
        api_key: SecretString,
        engine_id: String,
        max_results: u32,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            engine_id,
            base_url: "https://www.googleapis.com".to_string(),
            max_results: max_results.clamp(1, 10),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn search(&self, query: &str) -> anyhow::Result<String> {
        let url = format!("{}/customsearch/v1", self.base_url);
        let num = self.max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.expose_secret()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("search request failed with status: {status}");
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(format_results(&parsed.items, query))
    }
}

/// Render the hits the way the model consumes them.
fn format_results(items: &[SearchItem], query: &str) -> String {
    if items.is_empty() {
        return format!("No results found for: {query}");
    }

    items
        .iter()
        .map(|item| {
            format!(
                "Title: {}\nSnippet: {}\nURL: {}",
                item.title, item.snippet, item.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web. Use when the answer needs outside information you \
         cannot know: current news, today's date, recent events, or general \
         web facts."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query. Be specific for better results."
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required parameter: query"))?;

        tracing::info!(query, "running web search");

        // Soft failure: the model gets the error text and can apologize.
        let content = match self.search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "web search failed");
                format!("Web search failed: {e}")
            }
        };

        Ok(ToolOutput {
            name: WEB_SEARCH_TOOL_NAME.to_string(),
            content,
        })
    }
}
