//! `get_epic_status`: detailed view of one epic.

use serde::Serialize;
use tracing::debug;

use crate::core::grammar::TaskGrammar;
use crate::core::phase::{ArtifactPresence, effective_phase, next_action};
use crate::core::resolver::TaskStats;
use crate::core::state::YoloState;
use crate::io::artifacts::{artifact_presence, load_task_stats};
use crate::io::paths::{Workspace, validate_epic_name};
use crate::io::state_store::read_state;

/// Result of `get_epic_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EpicStatusReport {
    Found(EpicStatus),
    Missing { found: bool, error: String },
}

impl EpicStatusReport {
    fn missing(error: String) -> Self {
        EpicStatusReport::Missing {
            found: false,
            error,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, EpicStatusReport::Found(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicStatus {
    /// Always `true`; mirrors the `found: false` failure shape.
    pub found: bool,
    pub name: String,
    pub current_phase: String,
    pub artifacts: ArtifactPresence,
    pub tasks: TaskStats,
    pub yolo: Option<YoloState>,
    pub last_updated: Option<String>,
    pub next_action: String,
}

pub fn epic_status(ws: &Workspace, epic_name: &str, grammar: &impl TaskGrammar) -> EpicStatusReport {
    if let Err(err) = validate_epic_name(epic_name) {
        return EpicStatusReport::missing(err.to_string());
    }
    let epic = ws.epic(epic_name);
    if !epic.dir.exists() {
        return EpicStatusReport::missing(format!(
            "Epic \"{epic_name}\" not found. Start it with `/epic {epic_name}`"
        ));
    }

    let artifacts = artifact_presence(&epic);
    let state = if artifacts.state {
        read_state(&epic.state_path)
    } else {
        None
    };
    let tasks = load_task_stats(&epic, grammar).unwrap_or_else(|err| {
        debug!(epic = epic_name, err = %format!("{err:#}"), "task stats unavailable");
        TaskStats::default()
    });

    let current_phase = effective_phase(
        state.as_ref().map(|s| s.current_phase.as_str()),
        &artifacts,
    );
    let last_updated = state
        .as_ref()
        .map(|s| s.last_updated.clone())
        .filter(|ts| !ts.is_empty());

    EpicStatusReport::Found(EpicStatus {
        found: true,
        name: epic_name.to_string(),
        current_phase,
        artifacts,
        tasks,
        yolo: state.and_then(|s| s.yolo),
        last_updated,
        next_action: next_action(epic_name, &artifacts, &tasks),
    })
}
