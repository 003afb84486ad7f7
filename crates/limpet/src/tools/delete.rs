//! Phase-one deletion request tool.
//!
//! This is the only deletion surface the agent sees; actually removing the
//! file happens in [`crate::delete::DeleteCoordinator::perform`], which the
//! host calls after a human approves the sentinel this tool returns.

use async_trait::async_trait;

use crate::delete::DeleteCoordinator;
use crate::error::ToolError;
use crate::tool::Tool;

/// Request confirmation to delete a file from the output sandbox.
#[derive(Debug)]
pub struct RequestDeleteTool {
    coordinator: DeleteCoordinator,
}

impl RequestDeleteTool {
    /// Tool over `coordinator`.
    pub fn new(coordinator: DeleteCoordinator) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl Tool for RequestDeleteTool {
    fn name(&self) -> &str {
        "request_file_deletion"
    }

    fn description(&self) -> &str {
        "Ask the user to confirm deletion of a file in the output directory.\n\
         Use ONLY when the user explicitly asked to delete a specific file. \
         Input is the file path relative to the output directory. This tool \
         does NOT delete anything itself: it validates the path and returns a \
         'CONFIRM_DELETE|path' marker that the application shows to the user \
         for approval. Treat that marker as the final answer for the request. \
         Do not invent paths; use ones the user named or that a listing showed."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        self.coordinator.request(input.trim())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sandbox::Sandbox;

    #[tokio::test]
    async fn test_returns_sentinel_without_deleting() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("stale.txt"), "x").unwrap();
        let tool = RequestDeleteTool::new(DeleteCoordinator::new(
            Sandbox::open(dir.path()).unwrap(),
        ));

        let out = tool.invoke(" stale.txt ").await.unwrap();
        assert_eq!(out, "CONFIRM_DELETE|stale.txt");
        assert!(dir.path().join("stale.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error_observation() {
        let dir = TempDir::new().unwrap();
        let tool = RequestDeleteTool::new(DeleteCoordinator::new(
            Sandbox::open(dir.path()).unwrap(),
        ));

        let err = tool.invoke("ghost.txt").await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
