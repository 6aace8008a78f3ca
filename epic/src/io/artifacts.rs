//! Artifact store: plain reads and writes under `.epics/<name>/`.
//!
//! No workflow logic lives here. Callers decide whether an absent or
//! unreadable artifact is an error or an empty value.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::dependencies::DependencyGraph;
use crate::core::grammar::TaskGrammar;
use crate::core::phase::ArtifactPresence;
use crate::core::resolver::{TaskStats, task_stats};
use crate::core::types::{TaskFile, TaskRecord, sort_task_files};
use crate::io::paths::EpicPaths;

/// Read file contents if it exists, returning `None` for missing files.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read artifact {}", path.display()))?;
    Ok(Some(contents))
}

/// Read file contents, treating a missing or unreadable file as empty.
pub fn read_or_empty(path: &Path) -> String {
    match read_optional(path) {
        Ok(contents) => contents.unwrap_or_default(),
        Err(err) => {
            debug!(path = %path.display(), err = %format!("{err:#}"), "artifact unreadable, using empty");
            String::new()
        }
    }
}

/// True when `path` is a file with at least one byte. Does not read the contents.
pub fn has_content(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

/// Markdown task filenames in `tasks_dir`, sorted by numeric id prefix.
///
/// A missing directory yields an empty list.
pub fn list_task_files(tasks_dir: &Path) -> Result<Vec<String>> {
    if !tasks_dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let entries = fs::read_dir(tasks_dir)
        .with_context(|| format!("read tasks dir {}", tasks_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", tasks_dir.display()))?;
        let is_file = entry.file_type().is_ok_and(|ty| ty.is_file());
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_file && name.ends_with(".md") {
            files.push(name);
        }
    }
    sort_task_files(&mut files);
    Ok(files)
}

/// Read every task of an epic and parse its status.
pub fn load_tasks(epic: &EpicPaths, grammar: &impl TaskGrammar) -> Result<Vec<TaskRecord>> {
    let files = list_task_files(&epic.tasks_dir)?;
    let mut records = Vec::with_capacity(files.len());
    for file in files {
        let path = epic.task_path(&file);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("read task {}", path.display()))?;
        records.push(TaskRecord {
            task: TaskFile::from_file_name(file),
            status: grammar.status_of(&contents),
        });
    }
    debug!(epic = %epic.name, tasks = records.len(), "tasks loaded");
    Ok(records)
}

/// Per-status counts over every task of an epic.
pub fn load_task_stats(epic: &EpicPaths, grammar: &impl TaskGrammar) -> Result<TaskStats> {
    let tasks = load_tasks(epic, grammar)?;
    Ok(task_stats(tasks.iter().map(|record| &record.status)))
}

/// Parse the dependency graph from `plan.md`. A missing or unreadable plan has no edges.
pub fn load_dependencies(epic: &EpicPaths, grammar: &impl TaskGrammar) -> DependencyGraph {
    grammar.dependencies_of(&read_or_empty(&epic.plan_path))
}

/// Names of epic directories under `epics_dir`, sorted by name.
pub fn list_epic_names(epics_dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(epics_dir)
        .with_context(|| format!("read epics dir {}", epics_dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", epics_dir.display()))?;
        if entry.file_type().is_ok_and(|ty| ty.is_dir()) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

pub fn artifact_presence(epic: &EpicPaths) -> ArtifactPresence {
    ArtifactPresence {
        spec: epic.spec_path.exists(),
        research: epic.research_path.exists(),
        plan: epic.plan_path.exists(),
        tasks: epic.tasks_dir.exists(),
        state: epic.state_path.exists(),
    }
}

/// Atomically write `contents` to `path` (temp file + rename).
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grammar::MarkdownGrammar;
    use crate::core::types::TaskStatus;
    use crate::io::paths::Workspace;

    #[test]
    fn list_task_files_filters_and_sorts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path();
        for name in ["10-last.md", "02-b.md", "notes.txt", "01-a.md"] {
            fs::write(dir.join(name), "x").expect("write");
        }
        fs::create_dir(dir.join("03-dir.md")).expect("mkdir");

        let files = list_task_files(dir).expect("list");
        assert_eq!(files, vec!["01-a.md", "02-b.md", "10-last.md"]);
    }

    #[test]
    fn missing_tasks_dir_is_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let files = list_task_files(&temp.path().join("tasks")).expect("list");
        assert!(files.is_empty());
    }

    #[test]
    fn load_tasks_parses_statuses() {
        let temp = tempfile::tempdir().expect("tempdir");
        let epic = Workspace::new(temp.path(), None).epic("auth");
        fs::create_dir_all(&epic.tasks_dir).expect("mkdir");
        fs::write(epic.task_path("02-b.md"), "## Status: done\n").expect("write");
        fs::write(epic.task_path("01-a.md"), "## Status: pending\n").expect("write");

        let tasks = load_tasks(&epic, &MarkdownGrammar).expect("load");
        let summary: Vec<(&str, TaskStatus)> = tasks
            .iter()
            .map(|r| (r.task.id.as_str(), r.status))
            .collect();
        assert_eq!(
            summary,
            vec![("01", TaskStatus::Pending), ("02", TaskStatus::Done)]
        );
    }

    #[test]
    fn has_content_checks_length_only() {
        let temp = tempfile::tempdir().expect("tempdir");
        let empty = temp.path().join("empty.md");
        let full = temp.path().join("full.md");
        fs::write(&empty, "").expect("write");
        fs::write(&full, [0xff, 0xfe]).expect("write");
        assert!(!has_content(&empty));
        assert!(has_content(&full));
        assert!(!has_content(&temp.path().join("missing.md")));
    }

    #[test]
    fn write_atomic_replaces_without_leaving_temp() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join(".state");
        write_atomic(&path, "one").expect("write");
        write_atomic(&path, "two").expect("rewrite");
        assert_eq!(fs::read_to_string(&path).expect("read"), "two");
        assert!(!temp.path().join("nested").join(".state.tmp").exists());
    }

    #[test]
    fn epic_names_are_sorted_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        for name in ["zeta", "alpha"] {
            fs::create_dir(temp.path().join(name)).expect("mkdir");
        }
        fs::write(temp.path().join("config.toml"), "").expect("write");
        assert_eq!(
            list_epic_names(temp.path()).expect("list"),
            vec!["alpha", "zeta"]
        );
    }
}
