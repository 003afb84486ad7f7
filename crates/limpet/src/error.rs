//! Error taxonomy for the tool layer.
//!
//! Every failure that can cross the tool boundary is a [`ToolError`] variant.
//! The agent executor driving the tools expects plain string observations,
//! never exceptions, so the dispatch layer renders each error through
//! [`ToolError::to_tool_message`] as an `Error: ...` line.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by sandbox resolution, file operations, the command gate
/// and the network tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested path escapes the sandbox or is malformed.
    #[error("invalid or disallowed path '{path}': {reason}")]
    PathRejected {
        /// The raw path string as supplied by the caller.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// The target does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The target exists but has the wrong type (file vs. directory).
    #[error("{0}")]
    WrongType(String),

    /// A command or script was refused by the execution policy.
    #[error("execution denied: {0}")]
    PolicyRejected(String),

    /// A bounded operation exceeded its wall-clock budget.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The executable named by a permitted command is not installed.
    #[error("command executable '{0}' not found")]
    ExecutableMissing(String),

    /// The tool input string does not match the expected wire format.
    #[error("{0}")]
    InvalidInput(String),

    /// A network tool failed at the HTTP layer.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A tool could not be constructed or an internal invariant failed.
    #[error("internal error: {0}")]
    Internal(String),

    /// Underlying filesystem or process error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Render the error as the string observation handed back to the agent.
    pub fn to_tool_message(&self) -> String {
        format!("Error: {self}")
    }
}
