//! Web page fetch tool.

use async_trait::async_trait;
use regex::Regex;
use url::Url;

use crate::error::ToolError;
use crate::limits::{ToolLimits, truncate_chars};
use crate::tool::Tool;
use crate::wire::split2;

/// Marker appended to truncated page text.
const FETCH_TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Fetch a web page and return its visible text.
///
/// The HTML is reduced to plain text with a small regex pipeline: script,
/// style and comment blocks are dropped, remaining tags are stripped, common
/// entities decoded and whitespace collapsed. Good enough for article-style
/// pages; no JavaScript is executed.
#[derive(Debug)]
pub struct FetchWebPageTool {
    client: reqwest::Client,
    limits: ToolLimits,
    blocks: Regex,
    comments: Regex,
    tags: Regex,
    whitespace: Regex,
}

impl FetchWebPageTool {
    /// Tool using `client` for requests.
    pub fn new(client: reqwest::Client, limits: ToolLimits) -> Result<Self, ToolError> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| ToolError::Internal(format!("invalid HTML pattern: {e}")))
        };
        Ok(Self {
            client,
            limits,
            blocks: compile(r"(?is)<(script|style|noscript|head)\b.*?</(script|style|noscript|head)>")?,
            comments: compile(r"(?s)<!--.*?-->")?,
            tags: compile(r"(?s)<[^>]*>")?,
            whitespace: compile(r"\s+")?,
        })
    }

    fn strip_html(&self, html: &str) -> String {
        let text = self.blocks.replace_all(html, " ");
        let text = self.comments.replace_all(&text, " ");
        let text = self.tags.replace_all(&text, " ");
        let text = text
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    fn parse_url(raw: &str) -> Result<Url, ToolError> {
        let url = Url::parse(raw).map_err(|e| {
            ToolError::InvalidInput(format!("invalid URL '{raw}': {e}"))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ToolError::InvalidInput(format!(
                "invalid URL '{raw}': must start with http:// or https://"
            )));
        }
        Ok(url)
    }
}

#[async_trait]
impl Tool for FetchWebPageTool {
    fn name(&self) -> &str {
        "fetch_web_page"
    }

    fn description(&self) -> &str {
        "Fetch a web page and return its visible text content.\n\
         Input format: 'URL|Task Description', for example \
         'https://example.com|Summarize the page'. The URL must start with \
         http:// or https://. The task description is for your own reference \
         when reading the result. Output is the cleaned page text, truncated \
         if very long. JavaScript-heavy pages may yield little text."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (raw_url, task) = split2(input, "URL|Task Description")?;
        let url = Self::parse_url(raw_url.trim())?;
        tracing::info!(url = %url, task = %task.trim(), "fetching web page");

        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        let html = response.text().await?;
        let text = self.strip_html(&html);
        if text.is_empty() {
            return Ok(format!(
                "Warning: Successfully fetched {url} but no visible text content was found. \
                 The page may be script-rendered or primarily non-text."
            ));
        }
        Ok(truncate_chars(
            &text,
            self.limits.max_fetch_chars,
            FETCH_TRUNCATION_MARKER,
        ))
    }
}
