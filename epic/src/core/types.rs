//! Shared deterministic types for epic core logic.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task, derived from the status marker in its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// Pending or in-progress: the task still needs an executor.
    pub fn is_open(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task file under `tasks/`, identified by the numeric prefix of its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    /// Leading digits of the filename (`"03"` for `03-wire-api.md`), empty if none.
    pub id: String,
    /// Bare filename, e.g. `03-wire-api.md`.
    pub file: String,
}

impl TaskFile {
    pub fn from_file_name(file: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            id: id_prefix(&file).to_string(),
            file,
        }
    }

    /// Numeric value of the id, used for ordering. Missing prefixes sort as 0.
    pub fn ordinal(&self) -> u64 {
        ordinal_of(&self.id)
    }
}

/// A task together with the status parsed from its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub task: TaskFile,
    pub status: TaskStatus,
}

/// Return the run of ASCII digits at the start of `file_name`.
pub fn id_prefix(file_name: &str) -> &str {
    let end = file_name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(file_name.len());
    &file_name[..end]
}

/// Numeric value of a task id. Empty or overflowing ids sort as 0.
pub fn ordinal_of(id: &str) -> u64 {
    id.parse().unwrap_or(0)
}

/// Sort task filenames by numeric id prefix, keeping filename order among ties.
pub fn sort_task_files(files: &mut [String]) {
    files.sort_by(|a, b| {
        ordinal_of(id_prefix(a))
            .cmp(&ordinal_of(id_prefix(b)))
            .then_with(|| a.cmp(b))
    });
}
