//! `list_epics`: one summary line per epic directory.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::core::grammar::TaskGrammar;
use crate::core::phase::{Phase, infer_phase};
use crate::io::artifacts::{artifact_presence, list_epic_names, load_task_stats};
use crate::io::paths::{EpicPaths, Workspace};
use crate::io::state_store::read_state;

const NO_EPICS_MESSAGE: &str = "No epics found. Start one with `/epic <name>`";

/// Result of `list_epics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EpicListing {
    pub epics: Vec<EpicSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicSummary {
    pub name: String,
    pub phase: String,
    /// Only reported while the epic is executing.
    pub tasks: Option<TaskProgress>,
    pub yolo_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskProgress {
    pub done: usize,
    pub total: usize,
}

/// Summarize every epic under the workspace, in name order.
pub fn list_epics(ws: &Workspace, grammar: &impl TaskGrammar) -> EpicListing {
    if !ws.epics_dir.exists() {
        return EpicListing {
            message: Some(NO_EPICS_MESSAGE.to_string()),
            ..EpicListing::default()
        };
    }
    match summarize_all(&ws.epics_dir, grammar) {
        Ok(epics) => EpicListing {
            epics,
            ..EpicListing::default()
        },
        Err(err) => EpicListing {
            error: Some(format!("{err:#}")),
            ..EpicListing::default()
        },
    }
}

fn summarize_all(epics_dir: &Path, grammar: &impl TaskGrammar) -> Result<Vec<EpicSummary>> {
    let names = list_epic_names(epics_dir)?;
    Ok(names
        .iter()
        .map(|name| summarize(&EpicPaths::new(epics_dir, name), grammar))
        .collect())
}

fn summarize(epic: &EpicPaths, grammar: &impl TaskGrammar) -> EpicSummary {
    let (phase, yolo_active) = if epic.state_path.exists() {
        match read_state(&epic.state_path) {
            Some(state) if !state.current_phase.is_empty() => {
                let active = state.yolo_active();
                (state.current_phase, active)
            }
            Some(state) => (Phase::Unknown.as_str().to_string(), state.yolo_active()),
            None => (Phase::Unknown.as_str().to_string(), false),
        }
    } else {
        let inferred = infer_phase(&artifact_presence(epic));
        (inferred.as_str().to_string(), false)
    };

    let tasks = (Phase::from_label(&phase) == Phase::Execute).then(|| {
        let stats = load_task_stats(epic, grammar).unwrap_or_else(|err| {
            debug!(epic = %epic.name, err = %format!("{err:#}"), "task stats unavailable");
            Default::default()
        });
        TaskProgress {
            done: stats.done,
            total: stats.total,
        }
    });

    EpicSummary {
        name: epic.name.clone(),
        phase,
        tasks,
        yolo_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grammar::MarkdownGrammar;
    use crate::test_support::{EpicFixture, task_doc};

    #[test]
    fn missing_epics_dir_reports_message() {
        let fixture = EpicFixture::new();
        let listing = list_epics(&fixture.workspace(), &MarkdownGrammar);
        assert!(listing.epics.is_empty());
        assert_eq!(listing.message.as_deref(), Some(NO_EPICS_MESSAGE));
        assert_eq!(listing.error, None);
    }

    #[test]
    fn lists_recorded_and_inferred_phases() {
        let fixture = EpicFixture::new();
        fixture.write_artifact("billing", "spec.md", "spec");
        fixture.write_artifact("billing", "plan.md", "plan");
        fixture.write_task("auth", "01-a.md", &task_doc("A", "done"));
        fixture.write_task("auth", "02-b.md", &task_doc("B", "pending"));
        fixture.write_state(
            "auth",
            r#"{"name":"auth","currentPhase":"execute","yolo":{"active":true,"iteration":1}}"#,
        );

        let listing = list_epics(&fixture.workspace(), &MarkdownGrammar);
        assert_eq!(
            listing.epics,
            vec![
                EpicSummary {
                    name: "auth".to_string(),
                    phase: "execute".to_string(),
                    tasks: Some(TaskProgress { done: 1, total: 2 }),
                    yolo_active: true,
                },
                EpicSummary {
                    name: "billing".to_string(),
                    phase: "plan".to_string(),
                    tasks: None,
                    yolo_active: false,
                },
            ]
        );
    }

    #[test]
    fn corrupt_state_lists_as_unknown() {
        let fixture = EpicFixture::new();
        fixture.write_task("auth", "01-a.md", &task_doc("A", "pending"));
        fixture.write_state("auth", "{ nope");

        let listing = list_epics(&fixture.workspace(), &MarkdownGrammar);
        assert_eq!(listing.epics[0].phase, "unknown");
        assert_eq!(listing.epics[0].tasks, None);
    }

    #[test]
    fn summary_serializes_null_tasks() {
        let summary = EpicSummary {
            name: "auth".to_string(),
            phase: "spec".to_string(),
            tasks: None,
            yolo_active: false,
        };
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"name": "auth", "phase": "spec", "tasks": null, "yoloActive": false})
        );
    }
}
