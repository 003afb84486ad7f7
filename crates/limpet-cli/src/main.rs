//! Limpet CLI - drive the sandboxed tool layer from the command line.
//!
//! Usage:
//!   limpet list                        Show the available tools
//!   limpet invoke read_file notes.txt  Invoke a tool with a raw input string
//!
//! When a tool returns a deletion confirmation marker, the CLI prompts the
//! user on stdin and only then performs the deletion. This is the human gate
//! the tool layer itself never crosses.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use limpet::{DeleteCoordinator, Sandbox, ToolConfig, build_toolset};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "limpet", version, about = "Sandboxed tool layer for LLM agents")]
struct Cli {
    /// Output sandbox directory for all file tools.
    #[arg(long, default_value = "outputs")]
    outputs: PathBuf,

    /// Directory of vetted scripts the command gate may run.
    #[arg(long, default_value = "scripts")]
    scripts: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available tools.
    List,
    /// Invoke a tool by name with a raw input string.
    Invoke {
        /// Tool name, as shown by `list`.
        tool: String,
        /// Raw input string; empty when omitted.
        #[arg(default_value = "")]
        input: String,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "limpet=info",
        _ => "limpet=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Ask the user to approve a deletion the agent requested.
fn confirm_deletion(rel_path: &str) -> anyhow::Result<bool> {
    print!("The agent requests deletion of '{rel_path}'. Delete it? [y/N] ");
    io::stdout().flush().context("flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ToolConfig::new()
        .with_outputs_dir(&cli.outputs)
        .with_scripts_dir(&cli.scripts)
        .news_api_key_from_env();
    let tools = build_toolset(&config).context("assemble tool set")?;

    match cli.command {
        Command::List => {
            print!("{}", tools.render_index());
        }
        Command::Invoke { tool, input } => {
            let observation = tools.dispatch(&tool, &input).await;
            match DeleteCoordinator::parse_confirmation(&observation) {
                Some(rel_path) => {
                    if confirm_deletion(rel_path)? {
                        let coordinator = DeleteCoordinator::new(
                            Sandbox::open(&cli.outputs).context("open output sandbox")?,
                        );
                        match coordinator.perform(rel_path) {
                            Ok(message) => println!("{message}"),
                            Err(e) => println!("{}", e.to_tool_message()),
                        }
                    } else {
                        println!("Deletion of '{rel_path}' cancelled.");
                    }
                }
                None => println!("{observation}"),
            }
        }
    }
    Ok(())
}
