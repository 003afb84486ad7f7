//! File operations bounded by a [`Sandbox`].
//!
//! All operations resolve their target through [`Sandbox::resolve`] first and
//! return structured results; the tool wrappers in [`crate::tools`] own the
//! wire format and the observation strings.

use std::fs;
use std::io::Write as _;

use crate::error::ToolError;
use crate::limits::{ToolLimits, truncate_chars};
use crate::sandbox::Sandbox;

/// Marker appended to truncated file reads.
const READ_TRUNCATION_MARKER: &str = "\n... (truncated)";

/// A single child entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name (no path).
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Result of a capped directory listing.
#[derive(Debug, Clone)]
pub struct DirListing {
    /// Listed path, relative to the sandbox root (`.` for the root).
    pub path: String,
    /// Entries up to the configured cap, alphabetically sorted.
    pub entries: Vec<DirEntry>,
    /// How many further entries were omitted by the cap.
    pub remainder: usize,
}

/// Outcome of a literal find/replace over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The find string did not occur; the file was left byte-identical.
    NoMatch,
    /// All occurrences were substituted and the file rewritten.
    Replaced(usize),
}

/// Sandboxed read/write/append/replace/list operations.
#[derive(Debug, Clone)]
pub struct SandboxFs {
    sandbox: Sandbox,
    limits: ToolLimits,
}

impl SandboxFs {
    /// Create a filesystem facade over `sandbox` with the given budgets.
    pub fn new(sandbox: Sandbox, limits: ToolLimits) -> Self {
        Self { sandbox, limits }
    }

    /// The underlying sandbox.
    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Read a file, decoding leniently and truncating to the read budget.
    pub fn read(&self, raw_path: &str) -> Result<String, ToolError> {
        let target = self.sandbox.resolve(raw_path)?;
        if !target.exists() {
            return Err(ToolError::NotFound(format!("file '{raw_path}'")));
        }
        if !target.is_file() {
            return Err(ToolError::WrongType(format!(
                "path '{}' exists but is not a file",
                self.sandbox.display_relative(&target)
            )));
        }
        let bytes = fs::read(&target)?;
        let content = String::from_utf8_lossy(&bytes);
        tracing::debug!(path = %raw_path, chars = content.chars().count(), "read file");
        Ok(truncate_chars(
            &content,
            self.limits.max_read_chars,
            READ_TRUNCATION_MARKER,
        ))
    }

    /// Write `content` to a file, creating parents and overwriting
    /// unconditionally. Returns the written path relative to the root.
    pub fn write(&self, raw_path: &str, content: &str) -> Result<String, ToolError> {
        let target = self.prepare_write_target(raw_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        tracing::debug!(path = %raw_path, chars = content.len(), "wrote file");
        Ok(self.sandbox.display_relative(&target))
    }

    /// Append `content` to a file, creating it (and parents) if absent.
    ///
    /// A separator newline is inserted only when the file already exists
    /// and is non-empty.
    pub fn append(&self, raw_path: &str, content: &str) -> Result<String, ToolError> {
        let target = self.prepare_write_target(raw_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let needs_separator = fs::metadata(&target).map(|m| m.len() > 0).unwrap_or(false);
        let mut file = fs::OpenOptions::new().create(true).append(true).open(&target)?;
        if needs_separator {
            file.write_all(b"\n")?;
        }
        file.write_all(content.as_bytes())?;
        tracing::debug!(path = %raw_path, chars = content.len(), "appended to file");
        Ok(self.sandbox.display_relative(&target))
    }

    /// Substitute every literal, case-sensitive occurrence of `find` with
    /// `replace`, rewriting the file only when at least one match was found.
    pub fn replace(
        &self,
        raw_path: &str,
        find: &str,
        replace: &str,
    ) -> Result<ReplaceOutcome, ToolError> {
        if find.is_empty() {
            return Err(ToolError::InvalidInput(
                "find string must not be empty".to_string(),
            ));
        }
        let target = self.sandbox.resolve(raw_path)?;
        if !target.exists() {
            return Err(ToolError::NotFound(format!("file '{raw_path}'")));
        }
        if !target.is_file() {
            return Err(ToolError::WrongType(format!(
                "path '{}' exists but is not a file",
                self.sandbox.display_relative(&target)
            )));
        }
        let content = fs::read_to_string(&target)?;
        let count = content.matches(find).count();
        if count == 0 {
            return Ok(ReplaceOutcome::NoMatch);
        }
        fs::write(&target, content.replace(find, replace))?;
        tracing::debug!(path = %raw_path, occurrences = count, "replaced text");
        Ok(ReplaceOutcome::Replaced(count))
    }

    /// List the immediate children of a directory, alphabetically, capped at
    /// the listing budget.
    ///
    /// Children whose own canonical resolution escapes the sandbox (for
    /// example via a symlink) are skipped silently rather than failing the
    /// whole listing.
    pub fn list(&self, raw_path: &str) -> Result<DirListing, ToolError> {
        let target = self.sandbox.resolve(raw_path)?;
        if !target.exists() {
            return Err(ToolError::NotFound(format!("directory '{raw_path}'")));
        }
        if !target.is_dir() {
            return Err(ToolError::WrongType(format!(
                "path '{}' is not a directory",
                self.sandbox.display_relative(&target)
            )));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&target)? {
            let entry = entry?;
            let path = entry.path();
            if !self.sandbox.contains_canonical(&path) {
                tracing::debug!(entry = %path.display(), "skipping entry that escapes sandbox");
                continue;
            }
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: path.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let cap = self.limits.max_list_entries;
        let remainder = entries.len().saturating_sub(cap);
        entries.truncate(cap);

        Ok(DirListing {
            path: self.sandbox.display_relative(&target),
            entries,
            remainder,
        })
    }

    /// Resolve a write target, rejecting the root itself and existing
    /// directories.
    fn prepare_write_target(&self, raw_path: &str) -> Result<std::path::PathBuf, ToolError> {
        let target = self.sandbox.resolve(raw_path)?;
        if self.sandbox.is_root(&target) {
            return Err(ToolError::InvalidInput(
                "cannot write to the sandbox root itself; specify a filename".to_string(),
            ));
        }
        if target.is_dir() {
            return Err(ToolError::WrongType(format!(
                "cannot write: '{}' is an existing directory",
                self.sandbox.display_relative(&target)
            )));
        }
        Ok(target)
    }
}
