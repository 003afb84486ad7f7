//! Tool trait and registry.
//!
//! A [`Tool`] is a named capability with a single string-in/string-out
//! contract: the agent executor passes the raw argument string and expects a
//! plain observation back. Tools return [`ToolError`] internally; the
//! [`ToolSet`] dispatcher is the one place errors are rendered into `Error:`
//! observations, so no tool failure ever surfaces as anything but a string.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ToolError;

/// A capability the agent can invoke by name.
///
/// Implementations must be thread-safe for use across async tasks.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Description shown to the driving model, including the expected input
    /// format. The first line is used in index listings.
    fn description(&self) -> &str;

    /// Run the tool against a raw input string.
    async fn invoke(&self, input: &str) -> Result<String, ToolError>;
}

/// In-memory collection of tools with name-based dispatch.
#[derive(Default, Clone)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a tool set from a collection of tools.
    pub fn with_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        Self {
            tools: tools.into_iter().collect(),
        }
    }

    /// Add a tool.
    pub fn add(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    /// All registered tools, in registration order.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Check whether a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Invoke a tool by name, folding every failure into the observation
    /// string.
    pub async fn dispatch(&self, name: &str, input: &str) -> String {
        let Some(tool) = self.get(name) else {
            let known: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
            return format!(
                "Error: unknown tool '{name}'. Available tools: {}",
                known.join(", ")
            );
        };
        tracing::info!(tool = name, input_chars = input.chars().count(), "invoking tool");
        match tool.invoke(input).await {
            Ok(observation) => observation,
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "tool returned error");
                e.to_tool_message()
            }
        }
    }

    /// Render an aligned `name  summary` listing, one tool per line.
    ///
    /// Only the first line of each description is used; the full text is for
    /// the model prompt, not the index.
    pub fn render_index(&self) -> String {
        if self.tools.is_empty() {
            return String::new();
        }
        let width = self
            .tools
            .iter()
            .map(|t| t.name().len())
            .max()
            .unwrap_or(0)
            + 4;
        let mut out = String::new();
        for tool in &self.tools {
            let summary = tool.description().lines().next().unwrap_or("");
            out.push_str(tool.name());
            out.push_str(&" ".repeat(width - tool.name().len()));
            out.push_str(summary);
            out.push('\n');
        }
        out
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        f.debug_struct("ToolSet").field("tools", &names).finish()
    }
}
