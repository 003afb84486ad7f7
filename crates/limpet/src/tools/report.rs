//! Markdown report generation tool.

use async_trait::async_trait;
use chrono::Local;

use crate::error::ToolError;
use crate::sandbox::Sandbox;
use crate::tool::Tool;
use crate::wire::{decode_escapes, split3};

/// Write a titled Markdown report into the output sandbox.
///
/// Reports always land directly under the sandbox root: any directory part
/// of the supplied filename is discarded and a `.md` extension is enforced.
#[derive(Debug)]
pub struct GenerateReportTool {
    sandbox: Sandbox,
}

impl GenerateReportTool {
    /// Tool over `sandbox`.
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    /// Reduce a raw filename field to a safe root-level `.md` name.
    fn clean_filename(raw: &str) -> Result<String, ToolError> {
        let cleaned = raw.trim().replace('\\', "/");
        if cleaned.split('/').any(|segment| segment == "..") {
            return Err(ToolError::PathRejected {
                path: raw.to_string(),
                reason: "path traversal ('..') is not allowed".to_string(),
            });
        }
        let name = cleaned.rsplit('/').next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(ToolError::InvalidInput(
                "report filename must not be empty".to_string(),
            ));
        }
        if name.to_lowercase().ends_with(".md") {
            Ok(name.to_string())
        } else {
            Ok(format!("{name}.md"))
        }
    }
}

#[async_trait]
impl Tool for GenerateReportTool {
    fn name(&self) -> &str {
        "generate_report"
    }

    fn description(&self) -> &str {
        "Create a formatted Markdown report file in the output directory.\n\
         Input format: 'filename|Report Title|Report content'. The filename \
         is used without any directory part and gets a .md extension if \
         missing. Use \\n in the content for new lines and blank lines \
         between paragraphs. Returns the path of the created report."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (filename, title, content) = split3(input, "filename|Report Title|Report content")?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ToolError::InvalidInput(
                "report title must not be empty".to_string(),
            ));
        }
        let name = Self::clean_filename(&filename)?;
        let target = self.sandbox.resolve(&name)?;
        let content = decode_escapes(content.trim());

        let generated = Local::now().format("%Y-%m-%d %H:%M");
        let body = format!("# {title}\n\n_Generated: {generated}_\n\n{content}\n");
        std::fs::write(&target, body)?;

        let rel = self.sandbox.display_relative(&target);
        tracing::info!(path = %rel, "report written");
        Ok(format!("Successfully created report at {rel}"))
    }
}
