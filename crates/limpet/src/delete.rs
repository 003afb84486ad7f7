//! Two-phase file deletion.
//!
//! Deletion is the one destructive operation, so the agent never performs it
//! directly. Phase one (exposed as a tool) validates the target and returns a
//! `CONFIRM_DELETE|<path>` sentinel that the host surfaces to a human. Phase
//! two ([`DeleteCoordinator::perform`]) runs only after out-of-band approval
//! and re-validates everything from scratch, since the filesystem may have
//! changed between the phases.

use std::fs;

use crate::error::ToolError;
use crate::sandbox::Sandbox;

/// Prefix of the phase-one confirmation sentinel.
pub const CONFIRM_DELETE_PREFIX: &str = "CONFIRM_DELETE|";

/// Validates deletion requests and carries out approved ones.
#[derive(Debug, Clone)]
pub struct DeleteCoordinator {
    sandbox: Sandbox,
}

impl DeleteCoordinator {
    /// Coordinator bounded by `sandbox`.
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    /// Phase one: validate `raw_path` and return the confirmation sentinel.
    ///
    /// Nothing is deleted here. The sentinel carries the path relative to the
    /// sandbox root so the human sees exactly what the agent asked for.
    pub fn request(&self, raw_path: &str) -> Result<String, ToolError> {
        let target = self.sandbox.resolve(raw_path)?;
        if !target.exists() {
            return Err(ToolError::NotFound(format!("file '{raw_path}'")));
        }
        if !target.is_file() {
            return Err(ToolError::WrongType(format!(
                "path '{}' is not a file, cannot request deletion",
                self.sandbox.display_relative(&target)
            )));
        }
        let rel = self.sandbox.display_relative(&target);
        tracing::info!(path = %rel, "deletion confirmation requested");
        Ok(format!("{CONFIRM_DELETE_PREFIX}{rel}"))
    }

    /// Extract the relative path from a phase-one sentinel, if `observation`
    /// is one.
    pub fn parse_confirmation(observation: &str) -> Option<&str> {
        observation.strip_prefix(CONFIRM_DELETE_PREFIX)
    }

    /// Phase two: delete the file named by an approved sentinel.
    ///
    /// The path is resolved and checked again in full. If it no longer
    /// resolves inside the sandbox the deletion is refused outright.
    pub fn perform(&self, rel_path: &str) -> Result<String, ToolError> {
        let target = self.sandbox.resolve(rel_path)?;
        if target.exists() && !self.sandbox.contains_canonical(&target) {
            tracing::error!(path = %rel_path, "approved deletion target escaped sandbox");
            return Err(ToolError::PathRejected {
                path: rel_path.to_string(),
                reason: "resolved path is outside the sandbox".to_string(),
            });
        }
        if !target.exists() {
            return Err(ToolError::NotFound(format!(
                "file '{rel_path}' (maybe it was already deleted?)"
            )));
        }
        if !target.is_file() {
            return Err(ToolError::WrongType(format!(
                "cannot delete: path '{rel_path}' is not a file"
            )));
        }

        fs::remove_file(&target)?;
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| rel_path.to_string());
        tracing::info!(path = %rel_path, "file deleted");
        Ok(format!("File '{name}' deleted successfully."))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fixture() -> (TempDir, DeleteCoordinator) {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        (dir, DeleteCoordinator::new(sandbox))
    }

    #[test]
    fn test_request_returns_sentinel_for_existing_file() {
        let (dir, coordinator) = fixture();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/old.txt"), "bye").unwrap();

        let sentinel = coordinator.request("sub/old.txt").unwrap();
        assert_eq!(sentinel, "CONFIRM_DELETE|sub/old.txt");
        // Phase one must not delete anything.
        assert!(dir.path().join("sub/old.txt").is_file());
    }

    #[test]
    fn test_request_missing_file() {
        let (_dir, coordinator) = fixture();
        assert!(matches!(
            coordinator.request("ghost.txt").unwrap_err(),
            ToolError::NotFound(_)
        ));
    }

    #[test]
    fn test_request_directory_is_rejected() {
        let (dir, coordinator) = fixture();
        std::fs::create_dir(dir.path().join("keep")).unwrap();
        assert!(matches!(
            coordinator.request("keep").unwrap_err(),
            ToolError::WrongType(_)
        ));
    }

    #[test]
    fn test_request_traversal_is_rejected() {
        let (_dir, coordinator) = fixture();
        assert!(matches!(
            coordinator.request("../elsewhere.txt").unwrap_err(),
            ToolError::PathRejected { .. }
        ));
    }

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(
            DeleteCoordinator::parse_confirmation("CONFIRM_DELETE|a/b.txt"),
            Some("a/b.txt")
        );
        assert_eq!(DeleteCoordinator::parse_confirmation("File deleted."), None);
    }

    #[test]
    fn test_perform_deletes_the_file() {
        let (dir, coordinator) = fixture();
        std::fs::write(dir.path().join("old.txt"), "bye").unwrap();

        let message = coordinator.perform("old.txt").unwrap();
        assert_eq!(message, "File 'old.txt' deleted successfully.");
        assert!(!dir.path().join("old.txt").exists());
    }

    #[test]
    fn test_perform_after_file_vanished() {
        let (_dir, coordinator) = fixture();
        let err = coordinator.perform("vanished.txt").unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert!(err.to_tool_message().contains("already deleted"));
    }

    #[test]
    fn test_perform_refuses_directory() {
        let (dir, coordinator) = fixture();
        std::fs::create_dir(dir.path().join("keep")).unwrap();
        assert!(matches!(
            coordinator.perform("keep").unwrap_err(),
            ToolError::WrongType(_)
        ));
        assert!(dir.path().join("keep").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_perform_refuses_symlink_escape() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("victim.txt"), "precious").unwrap();
        let (dir, coordinator) = fixture();
        std::os::unix::fs::symlink(
            outside.path().join("victim.txt"),
            dir.path().join("alias.txt"),
        )
        .unwrap();

        // The target was swapped for a symlink between the phases.
        assert!(coordinator.perform("alias.txt").is_err());
        assert!(outside.path().join("victim.txt").exists());
    }
}
