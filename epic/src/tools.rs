//! JSON tool surface: `{ "tool": <name>, "args": {...} }` in, result object out.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::available::{AvailabilityReport, available_tasks};
use crate::context::{ContextReport, task_context_report};
use crate::core::grammar::TaskGrammar;
use crate::epic_status::{EpicStatusReport, epic_status};
use crate::io::paths::Workspace;
use crate::list::{EpicListing, list_epics};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum ToolCall {
    ListEpics(ListEpicsArgs),
    GetEpicStatus(EpicArgs),
    GetAvailableTasks(EpicArgs),
    BuildTaskContext(TaskContextArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListEpicsArgs {
    /// Sub-directory holding `.epics/`, relative to the project root.
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicArgs {
    pub epic_name: String,
    #[serde(default)]
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContextArgs {
    pub epic_name: String,
    /// Numeric prefix of the task filename, e.g. `02`.
    pub task_id: String,
    #[serde(default)]
    pub base_path: Option<String>,
}

/// Result object of any tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Listing(EpicListing),
    Status(EpicStatusReport),
    Tasks(AvailabilityReport),
    Context(ContextReport),
}

impl ToolResult {
    /// True when the tool reported a structured failure (`found: false`,
    /// `success: false` or an `error` field).
    pub fn is_failure(&self) -> bool {
        match self {
            ToolResult::Listing(listing) => listing.error.is_some(),
            ToolResult::Status(report) => !report.is_found(),
            ToolResult::Tasks(report) => report.error.is_some(),
            ToolResult::Context(report) => !report.is_success(),
        }
    }
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ListEpics(_) => "list_epics",
            ToolCall::GetEpicStatus(_) => "get_epic_status",
            ToolCall::GetAvailableTasks(_) => "get_available_tasks",
            ToolCall::BuildTaskContext(_) => "build_task_context",
        }
    }
}

/// Parse a tool call. A missing or `null` `args` is read as `{}`.
pub fn parse_tool_call(raw: &str) -> Result<ToolCall> {
    let mut value: Value = serde_json::from_str(raw).context("parse tool call")?;
    if let Some(call) = value
        .as_object_mut()
        .filter(|call| call.get("args").is_none_or(Value::is_null))
    {
        call.insert("args".to_string(), Value::Object(Map::new()));
    }
    serde_json::from_value(value).context("parse tool call")
}

/// Run `call` against the project at `root`.
pub fn dispatch(root: &Path, call: &ToolCall, grammar: &impl TaskGrammar) -> ToolResult {
    debug!(tool = call.name(), root = %root.display(), "dispatching tool call");
    match call {
        ToolCall::ListEpics(args) => {
            let ws = Workspace::new(root, args.base_path.as_deref());
            ToolResult::Listing(list_epics(&ws, grammar))
        }
        ToolCall::GetEpicStatus(args) => {
            let ws = Workspace::new(root, args.base_path.as_deref());
            ToolResult::Status(epic_status(&ws, &args.epic_name, grammar))
        }
        ToolCall::GetAvailableTasks(args) => {
            let ws = Workspace::new(root, args.base_path.as_deref());
            ToolResult::Tasks(available_tasks(&ws, &args.epic_name, grammar))
        }
        ToolCall::BuildTaskContext(args) => {
            let ws = Workspace::new(root, args.base_path.as_deref());
            ToolResult::Context(task_context_report(
                &ws,
                &args.epic_name,
                &args.task_id,
                grammar,
            ))
        }
    }
}
