//! `epic` command line.
//!
//! Each tool prints its JSON result on stdout. `idle` runs one continuation
//! tick and writes the instruction for the host session, if any, as a JSON
//! line. Diagnostics go to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};

use epic::core::grammar::MarkdownGrammar;
use epic::exit_codes;
use epic::idle::{IdleSignal, on_idle};
use epic::io::config::{EpicConfig, load_config};
use epic::io::notify::FallbackNotifier;
use epic::io::paths::Workspace;
use epic::io::session::StdoutSink;
use epic::logging;
use epic::tools::{
    EpicArgs, ListEpicsArgs, TaskContextArgs, ToolCall, dispatch, parse_tool_call,
};

#[derive(Parser)]
#[command(
    name = "epic",
    version,
    about = "Epic workflow tools and autonomous continuation"
)]
struct Cli {
    /// Project root that contains `.epics/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all epics with their phase and task progress.
    List {
        #[arg(long)]
        base_path: Option<String>,
    },
    /// Detailed status of one epic.
    Status {
        epic: String,
        #[arg(long)]
        base_path: Option<String>,
    },
    /// Tasks whose dependencies are satisfied, and those still waiting.
    Tasks {
        epic: String,
        #[arg(long)]
        base_path: Option<String>,
    },
    /// Build the execution prompt for one task.
    Context {
        epic: String,
        /// Numeric prefix of the task filename, e.g. `02`.
        task_id: String,
        #[arg(long)]
        base_path: Option<String>,
    },
    /// Dispatch a `{"tool": ..., "args": {...}}` call (read from stdin when omitted).
    Call { json: Option<String> },
    /// Handle one idle signal from the agent host.
    Idle {
        #[arg(long)]
        session_id: Option<String>,
        #[arg(long)]
        base_path: Option<String>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let call = match cli.command {
        Command::List { base_path } => ToolCall::ListEpics(ListEpicsArgs { base_path }),
        Command::Status { epic, base_path } => ToolCall::GetEpicStatus(EpicArgs {
            epic_name: epic,
            base_path,
        }),
        Command::Tasks { epic, base_path } => ToolCall::GetAvailableTasks(EpicArgs {
            epic_name: epic,
            base_path,
        }),
        Command::Context {
            epic,
            task_id,
            base_path,
        } => ToolCall::BuildTaskContext(TaskContextArgs {
            epic_name: epic,
            task_id,
            base_path,
        }),
        Command::Call { json } => parse_tool_call(&read_call(json)?)?,
        Command::Idle {
            session_id,
            base_path,
        } => return cmd_idle(&cli.root, session_id, base_path.as_deref()),
    };

    let result = dispatch(&cli.root, &call, &MarkdownGrammar);
    print_json(&result)?;
    if result.is_failure() {
        return Ok(exit_codes::FAILED);
    }
    Ok(exit_codes::OK)
}

fn cmd_idle(root: &Path, session_id: Option<String>, base_path: Option<&str>) -> Result<i32> {
    let ws = Workspace::new(root, base_path);
    let config = load_config(&ws.config_path).unwrap_or_else(|err| {
        warn!(err = %format!("{err:#}"), "invalid config, using defaults");
        EpicConfig::default()
    });
    let notifier = FallbackNotifier::from_config(&config.notify);
    debug!(backends = ?notifier.backend_names(), "notifier chain");

    let signal = IdleSignal { session_id };
    let outcome = on_idle(&ws, &signal, &MarkdownGrammar, &notifier, &StdoutSink);
    debug!(?outcome, "idle tick finished");
    Ok(exit_codes::OK)
}

fn read_call(arg: Option<String>) -> Result<String> {
    if let Some(raw) = arg {
        return Ok(raw);
    }
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("read tool call from stdin")?;
    Ok(raw)
}

/// Print `value` as pretty JSON with a trailing newline.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize result")?;
    println!("{payload}");
    Ok(())
}
