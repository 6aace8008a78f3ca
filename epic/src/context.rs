//! `build_task_context`: package one task and everything before it into a
//! self-contained prompt for an executor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::core::grammar::TaskGrammar;
use crate::core::types::{TaskFile, TaskStatus};
use crate::io::artifacts::{has_content, list_task_files, read_or_empty};
use crate::io::paths::{EpicPaths, Workspace, validate_epic_name};
use crate::io::prompt::{PreviousTask, TaskContextInputs, render_task_context};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Epic \"{epic}\" not found at {}", .dir.display())]
    EpicNotFound { epic: String, dir: PathBuf },
    #[error("No spec.md found for epic \"{epic}\"")]
    MissingSpec { epic: String },
    #[error("Task \"{task_id}\" not found in {}", .tasks_dir.display())]
    TaskNotFound { task_id: String, tasks_dir: PathBuf },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A built context, or the note that there is nothing left to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskContext {
    Ready {
        task_file: String,
        task_path: PathBuf,
        prompt: String,
    },
    AlreadyDone {
        task_id: String,
    },
}

/// Result of `build_task_context` as returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ContextReport {
    Built {
        success: bool,
        task_file: String,
        task_path: String,
        prompt: String,
        message: String,
    },
    AlreadyDone {
        success: bool,
        already_done: bool,
        message: String,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl ContextReport {
    pub fn is_success(&self) -> bool {
        !matches!(self, ContextReport::Failed { .. })
    }
}

/// Build the execution prompt for `task_id` of `epic_name`.
///
/// Checks run in a fixed order: epic directory, spec, task file, done status.
/// A done task short-circuits before spec, research or plan are read.
pub fn build_task_context(
    ws: &Workspace,
    epic_name: &str,
    task_id: &str,
    grammar: &impl TaskGrammar,
) -> Result<TaskContext, ContextError> {
    validate_epic_name(epic_name)?;
    let epic = ws.epic(epic_name);
    if !epic.dir.is_dir() {
        return Err(ContextError::EpicNotFound {
            epic: epic_name.to_string(),
            dir: epic.dir,
        });
    }
    if !has_content(&epic.spec_path) {
        return Err(ContextError::MissingSpec {
            epic: epic_name.to_string(),
        });
    }

    let files = list_task_files(&epic.tasks_dir)?;
    let Some(target_file) = files.iter().find(|file| file.starts_with(task_id)) else {
        return Err(ContextError::TaskNotFound {
            task_id: task_id.to_string(),
            tasks_dir: epic.tasks_dir,
        });
    };
    let target = TaskFile::from_file_name(target_file.as_str());
    let task_path = epic.task_path(&target.file);
    let task_content = read_task(&task_path)?;

    if grammar.status_of(&task_content) == TaskStatus::Done {
        return Ok(TaskContext::AlreadyDone {
            task_id: task_id.to_string(),
        });
    }

    let previous_tasks = previous_tasks(&epic, &files, &target)?;
    let spec = fs::read_to_string(&epic.spec_path)
        .with_context(|| format!("read spec {}", epic.spec_path.display()))?;
    let inputs = TaskContextInputs {
        epic: epic_name.to_string(),
        task_id: task_id.to_string(),
        task_label: epic.task_label(&target.file),
        task_content,
        spec,
        research: read_or_empty(&epic.research_path),
        plan: read_or_empty(&epic.plan_path),
        previous_tasks,
    };
    let prompt = render_task_context(&inputs)?;

    info!(
        epic = epic_name,
        task_id,
        previous_tasks = inputs.previous_tasks.len(),
        "built task context"
    );
    Ok(TaskContext::Ready {
        task_file: target.file,
        task_path,
        prompt,
    })
}

/// Run [`build_task_context`] and shape the outcome for the host.
pub fn task_context_report(
    ws: &Workspace,
    epic_name: &str,
    task_id: &str,
    grammar: &impl TaskGrammar,
) -> ContextReport {
    match build_task_context(ws, epic_name, task_id, grammar) {
        Ok(TaskContext::Ready {
            task_file,
            task_path,
            prompt,
        }) => ContextReport::Built {
            success: true,
            task_file,
            task_path: task_path.display().to_string(),
            prompt,
            message: format!(
                "Context built for task {task_id}. Pass the 'prompt' field to the Task tool to execute with a sub-agent."
            ),
        },
        Ok(TaskContext::AlreadyDone { task_id }) => ContextReport::AlreadyDone {
            success: true,
            already_done: true,
            message: format!("Task {task_id} is already complete"),
        },
        Err(err) => ContextReport::Failed {
            success: false,
            error: format!("{err:#}"),
        },
    }
}

/// Every task with a lower id than `target`, ascending, regardless of status.
fn previous_tasks(
    epic: &EpicPaths,
    files: &[String],
    target: &TaskFile,
) -> anyhow::Result<Vec<PreviousTask>> {
    let cutoff = target.ordinal();
    files
        .iter()
        .map(|file| TaskFile::from_file_name(file.as_str()))
        .take_while(|task| task.ordinal() < cutoff)
        .map(|task| {
            let content = read_task(&epic.task_path(&task.file))?;
            Ok(PreviousTask {
                file: task.file,
                content,
            })
        })
        .collect()
}

fn read_task(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("read task {}", path.display()))
}
