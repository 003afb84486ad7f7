//! Gated command execution.
//!
//! The agent is never given a shell. Input is tokenized with `shell-words`,
//! checked against a small allow-list (plus one interpreter rule for vetted
//! scripts) and, if permitted, spawned directly as an argv vector with a
//! wall-clock timeout. The result is always a structured [`CommandOutput`];
//! policy rejections use the same shape with a non-zero exit code so the
//! agent reads one format for every outcome.

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::ToolError;
use crate::limits::{ToolLimits, truncate_chars};
use crate::sandbox::Sandbox;

/// Basic commands permitted without further checks.
const DEFAULT_ALLOWED: &[&str] = &[
    "ls", "pwd", "echo", "cat", "head", "tail", "grep", "wc", "date",
];

/// Interpreter permitted to run vetted scripts.
const INTERPRETER: &str = "python";

/// Captured result of a gated command.
///
/// `exit_code` is `0` on success, `127` when the executable is missing,
/// `-9` when the timeout fired and `1` for policy rejections and other
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Captured standard output, trimmed and truncated.
    pub stdout: String,
    /// Captured standard error, trimmed and truncated.
    pub stderr: String,
    /// Process exit code, or a sentinel for gate-level failures.
    pub exit_code: i32,
}

impl CommandOutput {
    fn failure(stderr: String, exit_code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr,
            exit_code,
        }
    }

    /// Serialize as the JSON observation handed back to the agent.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            r#"{"stdout": "", "stderr": "Error: failed to encode command output.", "exit_code": 1}"#
                .to_string()
        })
    }
}

/// Decides which argv vectors may be spawned.
#[derive(Debug, Clone)]
pub struct CommandPolicy {
    allowed: BTreeSet<String>,
    scripts: Sandbox,
}

impl CommandPolicy {
    /// Policy with the default allow-list, permitting `python` scripts
    /// resolved inside `scripts`.
    pub fn new(scripts: Sandbox) -> Self {
        Self {
            allowed: DEFAULT_ALLOWED.iter().map(|s| s.to_string()).collect(),
            scripts,
        }
    }

    /// Replace the basic-command allow-list.
    pub fn with_allowed<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = allowed.into_iter().map(Into::into).collect();
        self
    }

    /// The script sandbox the interpreter rule resolves against.
    pub fn scripts(&self) -> &Sandbox {
        &self.scripts
    }

    /// Human-readable allow-list for rejection messages and tool docs.
    pub fn describe_allowed(&self) -> String {
        let basics: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        format!("{} and '{INTERPRETER}' for vetted scripts", basics.join(", "))
    }

    /// Check a tokenized command against the policy, returning the argv to
    /// execute.
    ///
    /// For interpreter invocations the script argument is replaced with its
    /// resolved absolute path, so execution does not depend on the gate's
    /// working directory; remaining arguments are passed through unchanged.
    pub fn check(&self, argv: &[String]) -> Result<Vec<String>, ToolError> {
        let executable = match argv.first() {
            Some(exe) => exe.as_str(),
            None => {
                return Err(ToolError::PolicyRejected(
                    "command resulted in an empty argument list".to_string(),
                ));
            }
        };

        if self.allowed.contains(executable) {
            return Ok(argv.to_vec());
        }

        if executable == INTERPRETER {
            let script = argv.get(1).ok_or_else(|| {
                ToolError::PolicyRejected(format!(
                    "'{INTERPRETER}' requires a script path as its first argument"
                ))
            })?;
            let resolved = self.check_script(script)?;
            let mut exec_argv = vec![argv[0].clone(), resolved.display().to_string()];
            exec_argv.extend(argv[2..].iter().cloned());
            return Ok(exec_argv);
        }

        Err(ToolError::PolicyRejected(format!(
            "command '{executable}' is not on the allow-list; allowed: {}",
            self.describe_allowed()
        )))
    }

    /// The interpreter rule: the script must resolve inside the script
    /// sandbox, carry a `.py` extension and exist as a regular file.
    /// Returns the resolved absolute path.
    fn check_script(&self, raw_script: &str) -> Result<PathBuf, ToolError> {
        let resolved = self.scripts.resolve(raw_script).map_err(|e| {
            ToolError::PolicyRejected(format!("script path rejected: {e}"))
        })?;
        if resolved.extension().and_then(|e| e.to_str()) != Some("py") {
            return Err(ToolError::PolicyRejected(format!(
                "script '{raw_script}' must have a .py extension"
            )));
        }
        if !resolved.is_file() {
            return Err(ToolError::PolicyRejected(format!(
                "script '{raw_script}' does not exist in the script directory"
            )));
        }
        Ok(resolved)
    }
}

/// Executes policy-checked commands with bounded output and runtime.
#[derive(Debug, Clone)]
pub struct CommandGate {
    policy: CommandPolicy,
    limits: ToolLimits,
    workdir: PathBuf,
}

impl CommandGate {
    /// Build a gate spawning commands with `workdir` as their working
    /// directory.
    pub fn new(policy: CommandPolicy, limits: ToolLimits, workdir: PathBuf) -> Self {
        Self {
            policy,
            limits,
            workdir,
        }
    }

    /// The gate's policy.
    pub fn policy(&self) -> &CommandPolicy {
        &self.policy
    }

    /// Tokenize, check and run `raw`, capturing both streams.
    ///
    /// Never fails at the call site: every failure mode is folded into the
    /// returned [`CommandOutput`].
    pub async fn run(&self, raw: &str) -> CommandOutput {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CommandOutput::failure("Error: empty command received.".to_string(), 1);
        }

        let argv = match shell_words::split(trimmed) {
            Ok(argv) if !argv.is_empty() => argv,
            Ok(_) => {
                return CommandOutput::failure(
                    "Error: command parsed to an empty argument list.".to_string(),
                    1,
                );
            }
            Err(e) => {
                return CommandOutput::failure(
                    format!("Error: command parsing failed (check quoting): {e}"),
                    1,
                );
            }
        };

        let exec_argv = match self.policy.check(&argv) {
            Ok(exec_argv) => exec_argv,
            Err(e) => {
                tracing::warn!(command = %trimmed, "command rejected by policy");
                return CommandOutput::failure(e.to_tool_message(), 1);
            }
        };

        tracing::debug!(command = %trimmed, "spawning gated command");
        self.spawn(trimmed, &exec_argv).await
    }

    async fn spawn(&self, trimmed: &str, argv: &[String]) -> CommandOutput {
        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout = self.limits.command_timeout;
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                return CommandOutput::failure(
                    ToolError::ExecutableMissing(argv[0].clone()).to_tool_message(),
                    127,
                );
            }
            Ok(Err(e)) => {
                return CommandOutput::failure(
                    format!("Error: failed to execute command '{trimmed}': {e}"),
                    1,
                );
            }
            Err(_) => {
                tracing::warn!(command = %trimmed, timeout_secs = timeout.as_secs(), "command timed out");
                return CommandOutput::failure(
                    format!(
                        "{} (command '{trimmed}')",
                        ToolError::Timeout(timeout).to_tool_message()
                    ),
                    -9,
                );
            }
        };

        let cap = self.limits.max_stream_chars;
        let stdout = truncate_chars(
            String::from_utf8_lossy(&output.stdout).trim(),
            cap,
            "\n...(stdout truncated)",
        );
        let stderr = truncate_chars(
            String::from_utf8_lossy(&output.stderr).trim(),
            cap,
            "\n...(stderr truncated)",
        );
        let exit_code = exit_code_of(&output.status);
        tracing::debug!(command = %trimmed, exit_code, "command finished");

        CommandOutput {
            stdout,
            stderr,
            exit_code,
        }
    }
}

#[cfg(unix)]
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => code,
        // Terminated by a signal; report it the way a shell would.
        None => status.signal().map(|s| -s).unwrap_or(1),
    }
}

#[cfg(not(unix))]
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
