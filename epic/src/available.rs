//! `get_available_tasks`: which open tasks can start now.

use anyhow::Result;
use serde::Serialize;

use crate::core::grammar::TaskGrammar;
use crate::core::resolver::{Availability, resolve_availability};
use crate::io::artifacts::{load_dependencies, load_tasks};
use crate::io::paths::{EpicPaths, Workspace, validate_epic_name};

/// Result of `get_available_tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    #[serde(flatten)]
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvailabilityReport {
    fn with_message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn with_error(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

pub fn available_tasks(
    ws: &Workspace,
    epic_name: &str,
    grammar: &impl TaskGrammar,
) -> AvailabilityReport {
    if let Err(err) = validate_epic_name(epic_name) {
        return AvailabilityReport::with_error(err.to_string());
    }
    let epic = ws.epic(epic_name);
    if !epic.tasks_dir.exists() {
        return AvailabilityReport::with_message("No tasks directory found");
    }
    match resolve(&epic, grammar) {
        Ok(report) => report,
        Err(err) => AvailabilityReport::with_error(format!("{err:#}")),
    }
}

fn resolve(epic: &EpicPaths, grammar: &impl TaskGrammar) -> Result<AvailabilityReport> {
    let tasks = load_tasks(epic, grammar)?;
    if tasks.is_empty() {
        return Ok(AvailabilityReport::with_message("No task files found"));
    }
    let graph = load_dependencies(epic, grammar);
    Ok(AvailabilityReport {
        availability: resolve_availability(&tasks, &graph),
        ..AvailabilityReport::default()
    })
}
