//! Limpet: Sandboxed Tool Layer for LLM Agents
//!
//! Limpet exposes a set of string-in/string-out tools an agent executor can
//! call: sandboxed file access, allow-listed command execution, two-phase
//! file deletion, web page fetching, stock and news lookups, report
//! generation and CSV statistics. Every filesystem operation is confined to
//! a single output directory, every observation is bounded in size, and the
//! one destructive operation requires out-of-band human confirmation.

pub mod config;
pub mod delete;
pub mod error;
pub mod exec;
pub mod fs;
pub mod limits;
pub mod sandbox;
pub mod tool;
pub mod tools;
pub mod wire;

pub use config::ToolConfig;
pub use delete::{CONFIRM_DELETE_PREFIX, DeleteCoordinator};
pub use error::ToolError;
pub use exec::{CommandGate, CommandOutput, CommandPolicy};
pub use fs::SandboxFs;
pub use limits::ToolLimits;
pub use sandbox::Sandbox;
pub use tool::{Tool, ToolSet};
pub use tools::build_toolset;
