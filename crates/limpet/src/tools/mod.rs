//! The concrete tools exposed to the agent.
//!
//! Each tool is a thin wrapper: it decodes its pipe-delimited input, calls
//! into the core components ([`crate::fs`], [`crate::exec`],
//! [`crate::delete`] or an HTTP client) and renders the observation string.
//! Validation and budgets live in the core components so every tool goes
//! through the same sandbox and the same limits.

mod clock;
mod data;
mod delete;
mod filesystem;
mod market;
mod news;
mod report;
mod terminal;
mod web;

use std::sync::Arc;

pub use clock::CurrentDateTimeTool;
pub use data::CsvStatisticsTool;
pub use delete::RequestDeleteTool;
pub use filesystem::{
    AppendFileTool, ListDirectoryTool, ReadFileTool, ReplaceInFileTool, WriteFileTool,
};
pub use market::StockHistoryTool;
pub use news::NewsHeadlinesTool;
pub use report::GenerateReportTool;
pub use terminal::RunCommandTool;
pub use web::FetchWebPageTool;

use crate::config::ToolConfig;
use crate::delete::DeleteCoordinator;
use crate::error::ToolError;
use crate::exec::{CommandGate, CommandPolicy};
use crate::fs::SandboxFs;
use crate::limits::ToolLimits;
use crate::sandbox::Sandbox;
use crate::tool::{Tool, ToolSet};

/// User agent sent by the network tools.
const USER_AGENT: &str = concat!("limpet/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by all network tools.
pub(crate) fn http_client(limits: &ToolLimits) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .timeout(limits.http_timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ToolError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Assemble the full tool set described by `config`.
///
/// Opens (creating if necessary) both sandboxes, builds one shared HTTP
/// client and registers every tool. The returned set is the complete
/// capability surface handed to the agent.
pub fn build_toolset(config: &ToolConfig) -> Result<ToolSet, ToolError> {
    let outputs = Sandbox::open(&config.outputs_dir)?;
    let scripts = Sandbox::open(&config.scripts_dir)?;
    let limits = config.limits.clone();

    let fs = SandboxFs::new(outputs.clone(), limits.clone());
    let gate = CommandGate::new(
        CommandPolicy::new(scripts),
        limits.clone(),
        config.workdir.clone(),
    );
    let coordinator = DeleteCoordinator::new(outputs.clone());
    let client = http_client(&limits)?;

    let mut set = ToolSet::new();
    set.add(Arc::new(ReadFileTool::new(fs.clone())) as Arc<dyn Tool>);
    set.add(Arc::new(WriteFileTool::new(fs.clone())));
    set.add(Arc::new(AppendFileTool::new(fs.clone())));
    set.add(Arc::new(ReplaceInFileTool::new(fs.clone())));
    set.add(Arc::new(ListDirectoryTool::new(fs)));
    set.add(Arc::new(RunCommandTool::new(gate)));
    set.add(Arc::new(RequestDeleteTool::new(coordinator)));
    set.add(Arc::new(GenerateReportTool::new(outputs)));
    set.add(Arc::new(FetchWebPageTool::new(client.clone(), limits.clone())?));
    set.add(Arc::new(StockHistoryTool::new(client.clone(), limits)));
    set.add(Arc::new(NewsHeadlinesTool::new(
        client,
        config.news_api_key.clone(),
    )));
    set.add(Arc::new(CsvStatisticsTool::new()));
    set.add(Arc::new(CurrentDateTimeTool::new()));

    tracing::info!(tools = set.tools().len(), "tool set assembled");
    Ok(set)
}
