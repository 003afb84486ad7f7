//! News headlines tool backed by NewsAPI.org.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ToolError;
use crate::tool::Tool;

const NEWS_BASE_URL: &str = "https://newsapi.org/v2";

/// How many headlines to request; the agent decides how many to use.
const PAGE_SIZE: u32 = 10;

/// Source identifiers recognized by the source-vs-query heuristic. Not
/// exhaustive; anything else is treated as a free-text query.
const KNOWN_SOURCES: &[&str] = &[
    "hacker-news",
    "bbc-news",
    "reuters",
    "associated-press",
    "techcrunch",
    "the-verge",
    "engadget",
    "ars-technica",
    "google-news",
    "cnn",
    "fox-news",
    "the-wall-street-journal",
    "the-washington-post",
    "time",
    "wired",
];

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    #[serde(default)]
    source: ArticleSource,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// Fetch top headlines for a source ID or a search query.
#[derive(Debug)]
pub struct NewsHeadlinesTool {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsHeadlinesTool {
    /// Tool using `client`; without an API key every invocation degrades to
    /// an error observation.
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: NEWS_BASE_URL.to_string(),
        }
    }

    /// Point the tool at a different endpoint. Used by tests.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn format_headlines(query: &str, articles: &[Article]) -> String {
        let mut lines = vec![format!("Top {} Headlines for '{query}':", articles.len())];
        for (i, article) in articles.iter().enumerate() {
            let title = article.title.as_deref().unwrap_or("N/A");
            let source = article.source.name.as_deref().unwrap_or("N/A");
            lines.push(format!("{}. {title} (Source: {source})", i + 1));
        }
        lines.join("\n")
    }
}

#[async_trait]
impl Tool for NewsHeadlinesTool {
    fn name(&self) -> &str {
        "news_headlines"
    }

    fn description(&self) -> &str {
        "Fetch recent top news headlines for a source ID or a search query.\n\
         Input is a single string: either a known source ID (e.g. \
         'hacker-news', 'bbc-news', 'techcrunch') or a search query (e.g. \
         'artificial intelligence regulation'). Output is a numbered list of \
         headlines with their source names. Prefer this over web scraping \
         for news."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ToolError::InvalidInput(
                "news API key is not configured; set the NEWSAPI_API_KEY environment variable"
                    .to_string(),
            )
        })?;
        let query = input.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput(
                "query or source ID must not be empty".to_string(),
            ));
        }

        let lowered = query.to_lowercase();
        let mut params = vec![
            ("apiKey", api_key.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
        ];
        if KNOWN_SOURCES.contains(&lowered.as_str()) {
            tracing::debug!(source = %lowered, "using source ID");
            params.push(("sources", lowered));
        } else {
            tracing::debug!(query = %query, "using free-text query");
            params.push(("q", query.to_string()));
        }

        let url = format!("{}/top-headlines", self.base_url);
        let response = self.client.get(&url).query(&params).send().await?;
        let body: HeadlinesResponse = response.json().await?;

        if body.status != "ok" {
            return Err(ToolError::InvalidInput(format!(
                "news provider returned status '{}': {} ({})",
                body.status,
                body.message.as_deref().unwrap_or("no message provided"),
                body.code.as_deref().unwrap_or("no code")
            )));
        }
        if body.articles.is_empty() {
            return Ok(format!("Success: No news articles found for '{query}'."));
        }
        Ok(Self::format_headlines(query, &body.articles))
    }
}
