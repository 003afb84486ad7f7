//! File read, write, append, replace and list tools.

use async_trait::async_trait;

use crate::error::ToolError;
use crate::fs::{ReplaceOutcome, SandboxFs};
use crate::tool::Tool;
use crate::wire::{decode_escapes, split2, split3};

/// Read a file from the output sandbox.
#[derive(Debug)]
pub struct ReadFileTool {
    fs: SandboxFs,
}

impl ReadFileTool {
    /// Tool over `fs`.
    pub fn new(fs: SandboxFs) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a text file from the output directory.\n\
         Input is the file path relative to the output directory, for example \
         'notes.txt' or 'reports/draft.md'. Absolute paths and '..' are not \
         allowed. Output is the file content, truncated if very long, or an \
         'Error: ...' message."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        self.fs.read(input.trim())
    }
}

/// Write (overwrite) a file in the output sandbox.
#[derive(Debug)]
pub struct WriteFileTool {
    fs: SandboxFs,
}

impl WriteFileTool {
    /// Tool over `fs`.
    pub fn new(fs: SandboxFs) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write text to a file in the output directory, overwriting it if it exists.\n\
         Input format: 'path|content'. The path is relative to the output \
         directory; missing parent directories are created. Use \\n in the \
         content for new lines. Example: 'notes/plan.txt|Step 1\\nStep 2'."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (path, content) = split2(input, "path|content")?;
        let rel = self.fs.write(path.trim(), &decode_escapes(&content))?;
        Ok(format!("Successfully wrote content to file: {rel}"))
    }
}

/// Append to a file in the output sandbox.
#[derive(Debug)]
pub struct AppendFileTool {
    fs: SandboxFs,
}

impl AppendFileTool {
    /// Tool over `fs`.
    pub fn new(fs: SandboxFs) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for AppendFileTool {
    fn name(&self) -> &str {
        "append_file"
    }

    fn description(&self) -> &str {
        "Append text to a file in the output directory, creating it if absent.\n\
         Input format: 'path|content'. A separator newline is inserted before \
         the appended text when the file already has content. Use \\n in the \
         content for new lines."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (path, content) = split2(input, "path|content")?;
        let rel = self.fs.append(path.trim(), &decode_escapes(&content))?;
        Ok(format!("Successfully appended content to file: {rel}"))
    }
}

/// Literal find/replace over a file in the output sandbox.
#[derive(Debug)]
pub struct ReplaceInFileTool {
    fs: SandboxFs,
}

impl ReplaceInFileTool {
    /// Tool over `fs`.
    pub fn new(fs: SandboxFs) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for ReplaceInFileTool {
    fn name(&self) -> &str {
        "replace_in_file"
    }

    fn description(&self) -> &str {
        "Replace every occurrence of a literal text in a file in the output directory.\n\
         Input format: 'path|find|replace'. Matching is literal and \
         case-sensitive; no regular expressions. The find text must not be \
         empty. Reports how many occurrences were replaced."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (path, find, replace) = split3(input, "path|find|replace")?;
        let path = path.trim();
        let find = decode_escapes(&find);
        let replace = decode_escapes(&replace);
        match self.fs.replace(path, &find, &replace)? {
            ReplaceOutcome::NoMatch => Ok(format!(
                "No occurrences of the search text found in file: {path}; file unchanged."
            )),
            ReplaceOutcome::Replaced(count) => Ok(format!(
                "Successfully replaced {count} occurrence(s) in file: {path}"
            )),
        }
    }
}

/// List a directory inside the output sandbox.
#[derive(Debug)]
pub struct ListDirectoryTool {
    fs: SandboxFs,
}

impl ListDirectoryTool {
    /// Tool over `fs`.
    pub fn new(fs: SandboxFs) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List the files and directories directly inside a directory of the output directory.\n\
         Input is the directory path relative to the output directory; use '.' \
         or an empty string for the output directory itself. Each entry is \
         tagged (FILE) or (DIR). Long listings are truncated."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let listing = self.fs.list(input.trim())?;
        if listing.entries.is_empty() {
            return Ok(format!("Directory '{}' is empty.", listing.path));
        }
        let mut lines: Vec<String> = listing
            .entries
            .iter()
            .map(|e| {
                let tag = if e.is_dir { "DIR" } else { "FILE" };
                format!("{} ({tag})", e.name)
            })
            .collect();
        if listing.remainder > 0 {
            lines.push(format!(
                "... (truncated, {} more items exist)",
                listing.remainder
            ));
        }
        Ok(format!(
            "Contents of directory '{}':\n{}",
            listing.path,
            lines.join("\n")
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::limits::ToolLimits;
    use crate::sandbox::Sandbox;

    fn fixture() -> (TempDir, SandboxFs) {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        (dir, SandboxFs::new(sandbox, ToolLimits::default()))
    }

    #[tokio::test]
    async fn test_write_decodes_escapes_and_reports_path() {
        let (_dir, fs) = fixture();
        let write = WriteFileTool::new(fs.clone());
        let out = write.invoke("plan.txt|Step 1\\nStep 2").await.unwrap();
        assert_eq!(out, "Successfully wrote content to file: plan.txt");
        assert_eq!(fs.read("plan.txt").unwrap(), "Step 1\nStep 2");
    }

    #[tokio::test]
    async fn test_write_without_pipe_is_an_input_error() {
        let (_dir, fs) = fixture();
        let write = WriteFileTool::new(fs);
        let err = write.invoke("no-pipe-here").await.unwrap_err();
        assert!(err.to_tool_message().contains("path|content"));
    }

    #[tokio::test]
    async fn test_append_tool_separator() {
        let (_dir, fs) = fixture();
        let append = AppendFileTool::new(fs.clone());
        append.invoke("log.txt|first").await.unwrap();
        append.invoke("log.txt|second").await.unwrap();
        assert_eq!(fs.read("log.txt").unwrap(), "first\nsecond");
    }

    #[tokio::test]
    async fn test_replace_tool_messages() {
        let (_dir, fs) = fixture();
        fs.write("doc.txt", "a b a").unwrap();
        let replace = ReplaceInFileTool::new(fs.clone());

        let out = replace.invoke("doc.txt|a|z").await.unwrap();
        assert_eq!(out, "Successfully replaced 2 occurrence(s) in file: doc.txt");

        let out = replace.invoke("doc.txt|missing|z").await.unwrap();
        assert!(out.starts_with("No occurrences"));
        assert!(out.ends_with("file unchanged."));
    }

    #[tokio::test]
    async fn test_replace_keeps_pipes_in_replacement() {
        let (_dir, fs) = fixture();
        fs.write("doc.txt", "X").unwrap();
        let replace = ReplaceInFileTool::new(fs.clone());
        replace.invoke("doc.txt|X|a|b").await.unwrap();
        assert_eq!(fs.read("doc.txt").unwrap(), "a|b");
    }

    #[tokio::test]
    async fn test_list_tool_formats_entries() {
        let (_dir, fs) = fixture();
        fs.write("b.txt", "").unwrap();
        std::fs::create_dir(fs.sandbox().root().join("a_dir")).unwrap();
        let list = ListDirectoryTool::new(fs);

        let out = list.invoke(".").await.unwrap();
        assert_eq!(out, "Contents of directory '.':\na_dir (DIR)\nb.txt (FILE)");
    }

    #[tokio::test]
    async fn test_list_tool_empty_directory() {
        let (_dir, fs) = fixture();
        std::fs::create_dir(fs.sandbox().root().join("bare")).unwrap();
        let list = ListDirectoryTool::new(fs);
        assert_eq!(list.invoke("bare").await.unwrap(), "Directory 'bare' is empty.");
    }

    #[tokio::test]
    async fn test_list_tool_truncation_footer() {
        let (_dir, fs) = fixture();
        for i in 0..53 {
            fs.write(&format!("f{i:02}.txt"), "").unwrap();
        }
        let list = ListDirectoryTool::new(fs);
        let out = list.invoke("").await.unwrap();
        assert!(out.ends_with("... (truncated, 3 more items exist)"));
    }

    #[tokio::test]
    async fn test_read_tool_propagates_sandbox_rejection() {
        let (_dir, fs) = fixture();
        let read = ReadFileTool::new(fs);
        let err = read.invoke("../outside.txt").await.unwrap_err();
        assert!(matches!(err, ToolError::PathRejected { .. }));
    }
}
