//! Canonical paths under `.epics/` for a project root.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

pub const EPICS_DIR: &str = ".epics";
pub const STATE_FILE: &str = ".state";
pub const CONFIG_FILE: &str = "config.toml";

/// The `.epics/` directory of a project, optionally below a sub-path.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Project directory that contains `.epics/`.
    pub base_dir: PathBuf,
    pub epics_dir: PathBuf,
    pub config_path: PathBuf,
}

impl Workspace {
    /// Resolve the workspace for `root`, joined with `base_path` when one is given.
    ///
    /// An empty `base_path` is the same as none.
    pub fn new(root: impl Into<PathBuf>, base_path: Option<&str>) -> Self {
        let root = root.into();
        let base_dir = match base_path.filter(|p| !p.is_empty()) {
            Some(sub) => root.join(sub),
            None => root,
        };
        let epics_dir = base_dir.join(EPICS_DIR);
        Self {
            config_path: epics_dir.join(CONFIG_FILE),
            epics_dir,
            base_dir,
        }
    }

    pub fn epic(&self, name: &str) -> EpicPaths {
        EpicPaths::new(&self.epics_dir, name)
    }
}

/// All canonical paths for one epic.
#[derive(Debug, Clone)]
pub struct EpicPaths {
    pub name: String,
    pub dir: PathBuf,
    pub spec_path: PathBuf,
    pub research_path: PathBuf,
    pub plan_path: PathBuf,
    pub tasks_dir: PathBuf,
    pub state_path: PathBuf,
}

impl EpicPaths {
    pub fn new(epics_dir: &Path, name: &str) -> Self {
        let dir = epics_dir.join(name);
        Self {
            name: name.to_string(),
            spec_path: dir.join("spec.md"),
            research_path: dir.join("research.md"),
            plan_path: dir.join("plan.md"),
            tasks_dir: dir.join("tasks"),
            state_path: dir.join(STATE_FILE),
            dir,
        }
    }

    pub fn task_path(&self, file: &str) -> PathBuf {
        self.tasks_dir.join(file)
    }

    /// Project-relative label for a task file, as shown to the executor.
    pub fn task_label(&self, file: &str) -> String {
        format!("{EPICS_DIR}/{}/tasks/{file}", self.name)
    }
}

/// Validate that an epic name is a single path segment.
pub fn validate_epic_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("epic name must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(anyhow!("epic name must not be '{name}'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(anyhow!("epic name must not contain path separators (got '{name}')"));
    }
    Ok(())
}
