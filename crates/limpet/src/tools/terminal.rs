//! Gated terminal command tool.

use async_trait::async_trait;

use crate::error::ToolError;
use crate::exec::CommandGate;
use crate::tool::Tool;

/// Run an allow-listed command or vetted script.
#[derive(Debug)]
pub struct RunCommandTool {
    gate: CommandGate,
    description: String,
}

impl RunCommandTool {
    /// Tool over `gate`. The description embeds the gate's allow-list so the
    /// model sees exactly what is permitted.
    pub fn new(gate: CommandGate) -> Self {
        let description = format!(
            "Run an allow-listed shell command or a vetted Python script.\n\
             Input is the command line as a single string, for example \
             'ls -l' or 'python process.py data.csv'. Allowed: {}. Scripts \
             must be .py files inside the script directory, named by a \
             relative path. There is no shell: quoting is respected but \
             pipes, redirection and ';' chaining do not work. Output is a \
             JSON object with 'stdout', 'stderr' and 'exit_code'; check \
             'exit_code' (0 means success) and 'stderr' for problems.",
            gate.policy().describe_allowed()
        );
        Self { gate, description }
    }
}

#[async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        // Every failure mode is folded into the JSON observation.
        Ok(self.gate.run(input).await.to_json())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::exec::CommandPolicy;
    use crate::limits::ToolLimits;
    use crate::sandbox::Sandbox;

    fn fixture() -> (TempDir, RunCommandTool) {
        let dir = TempDir::new().unwrap();
        let scripts = Sandbox::open(dir.path().join("scripts")).unwrap();
        let gate = CommandGate::new(
            CommandPolicy::new(scripts),
            ToolLimits::default(),
            dir.path().to_path_buf(),
        );
        (dir, RunCommandTool::new(gate))
    }

    #[tokio::test]
    async fn test_observation_is_json() {
        let (_dir, tool) = fixture();
        let out = tool.invoke("echo hi").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["stdout"], "hi");
        assert_eq!(parsed["exit_code"], 0);
    }

    #[tokio::test]
    async fn test_rejection_is_also_json() {
        let (_dir, tool) = fixture();
        let out = tool.invoke("curl https://example.com").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["exit_code"], 1);
        assert!(
            parsed["stderr"]
                .as_str()
                .unwrap()
                .contains("not on the allow-list")
        );
    }

    #[tokio::test]
    async fn test_chained_command_runs_as_literal_arguments() {
        // No shell: the ';' and second command are plain echo arguments.
        let (_dir, tool) = fixture();
        let out = tool.invoke("echo hello; rm -rf /").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["exit_code"], 0);
        assert_eq!(parsed["stdout"], "hello; rm -rf /");
    }

    #[test]
    fn test_description_names_the_allow_list() {
        let (_dir, tool) = fixture();
        assert!(tool.description().contains("echo"));
        assert!(tool.description().contains("grep"));
    }
}
