//! Sandboxed path resolution.
//!
//! A [`Sandbox`] is a single directory outside of which no file operation may
//! read, write, list or delete. Every tool that touches the filesystem goes
//! through [`Sandbox::resolve`]; there is deliberately exactly one resolver so
//! the traversal rules cannot drift between tools.
//!
//! Resolution is defense-in-depth: the raw string is checked for absolute
//! prefixes and `..` segments *before* joining, and the joined path is then
//! canonicalized and compared against the canonical root, so neither string
//! tricks nor symlinks can escape. Paths that do not exist yet (write
//! targets) are canonicalized up to their nearest existing ancestor.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// A directory that bounds all filesystem access.
///
/// The root is created on construction if absent and stored in canonical
/// form. Resolution is computed fresh per request and never cached.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Open (creating if necessary) the sandbox rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    /// The canonical absolute root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied relative path to a safe absolute path.
    ///
    /// Empty input or `.` resolves to the root itself. The returned path is
    /// guaranteed to equal the root or be a descendant of it after symlink
    /// resolution; callers that create the path later do not need to
    /// re-check, because the not-yet-existing suffix was validated to be a
    /// plain relative remainder.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, ToolError> {
        let reject = |reason: &str| ToolError::PathRejected {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let cleaned = raw.trim().replace('\\', "/");
        let rel = Path::new(&cleaned);
        if rel.is_absolute() || cleaned.starts_with('/') {
            return Err(reject("absolute paths are not allowed"));
        }
        if cleaned.split('/').any(|segment| segment == "..") {
            return Err(reject("path traversal ('..') is not allowed"));
        }

        let candidate = self.root.join(rel);

        // Canonicalize the nearest existing ancestor, then re-attach the
        // not-yet-existing remainder (already known to be traversal-free).
        let mut existing = candidate;
        let mut pending = Vec::new();
        loop {
            match existing.canonicalize() {
                Ok(canonical) => {
                    let mut resolved = canonical;
                    for name in pending.iter().rev() {
                        resolved.push(name);
                    }
                    if resolved == self.root || resolved.starts_with(&self.root) {
                        return Ok(resolved);
                    }
                    tracing::warn!(path = %raw, resolved = %resolved.display(), "path escaped sandbox");
                    return Err(reject("resolved path is outside the sandbox"));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    match (existing.file_name(), existing.parent()) {
                        (Some(name), Some(parent)) => {
                            pending.push(name.to_os_string());
                            existing = parent.to_path_buf();
                        }
                        _ => return Err(reject("path could not be resolved")),
                    }
                }
                Err(e) => return Err(ToolError::Io(e)),
            }
        }
    }

    /// Whether `path` is the sandbox root itself.
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }

    /// Re-validate an absolute path against the sandbox by canonicalizing it.
    ///
    /// Used where a path crosses a trust boundary a second time (deletion
    /// confirmation, listing entries reached through symlinks): the file may
    /// have been replaced since it was first resolved.
    pub fn contains_canonical(&self, path: &Path) -> bool {
        match path.canonicalize() {
            Ok(canonical) => canonical == self.root || canonical.starts_with(&self.root),
            Err(_) => false,
        }
    }

    /// Display form of an absolute path, relative to the root (`.` for the
    /// root itself).
    pub fn display_relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => path.display().to_string(),
        }
    }
}
