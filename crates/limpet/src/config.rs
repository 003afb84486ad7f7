//! Runtime configuration for the tool layer.

use std::path::PathBuf;

use crate::limits::ToolLimits;

/// Environment variable holding the news API key.
pub const NEWS_API_KEY_VAR: &str = "NEWSAPI_API_KEY";

/// Everything needed to assemble a [`crate::ToolSet`].
///
/// Paths may be relative; they are canonicalized when the sandboxes are
/// opened. Built with chained `with_*` setters over [`ToolConfig::new`].
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Root of the output sandbox all file tools operate in.
    pub outputs_dir: PathBuf,
    /// Root of the vetted-script directory the command gate resolves
    /// `python` scripts against.
    pub scripts_dir: PathBuf,
    /// Working directory for gated commands.
    pub workdir: PathBuf,
    /// Output and time budgets.
    pub limits: ToolLimits,
    /// API key for the news headlines tool; the tool degrades to an error
    /// observation when absent.
    pub news_api_key: Option<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from("outputs"),
            scripts_dir: PathBuf::from("scripts"),
            workdir: PathBuf::from("."),
            limits: ToolLimits::default(),
            news_api_key: None,
        }
    }
}

impl ToolConfig {
    /// Configuration with default directories, budgets and no API keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output sandbox root.
    pub fn with_outputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outputs_dir = dir.into();
        self
    }

    /// Set the vetted-script directory.
    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = dir.into();
        self
    }

    /// Set the working directory for gated commands.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = dir.into();
        self
    }

    /// Replace the default budgets.
    pub fn with_limits(mut self, limits: ToolLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the news API key.
    pub fn with_news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Read the news API key from the environment, keeping any key already
    /// set.
    pub fn news_api_key_from_env(mut self) -> Self {
        if self.news_api_key.is_none() {
            self.news_api_key = std::env::var(NEWS_API_KEY_VAR).ok();
        }
        self
    }
}
