//! Test-only helpers: a temp project with `.epics/` and recording doubles.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::core::state::EpicState;
use crate::io::notify::{Notification, Notifier};
use crate::io::paths::Workspace;
use crate::io::session::SessionSink;
use crate::io::state_store::read_state;

/// A throwaway project root. Files are written under `.epics/` (below the
/// optional base path); the directory is removed on drop.
pub struct EpicFixture {
    temp: TempDir,
    base_path: Option<String>,
}

impl EpicFixture {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("tempdir"),
            base_path: None,
        }
    }

    pub fn with_base_path(base_path: &str) -> Self {
        Self {
            base_path: Some(base_path.to_string()),
            ..Self::new()
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.root(), self.base_path.as_deref())
    }

    /// Write `.epics/<epic>/<relative>`, creating parent directories.
    pub fn write_artifact(&self, epic: &str, relative: &str, contents: &str) {
        self.write_artifact_bytes(epic, relative, contents.as_bytes());
    }

    pub fn write_artifact_bytes(&self, epic: &str, relative: &str, contents: &[u8]) {
        let path = self.workspace().epic(epic).dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create artifact dir");
        }
        fs::write(&path, contents).expect("write artifact");
    }

    pub fn write_task(&self, epic: &str, file: &str, contents: &str) {
        self.write_artifact(epic, &format!("tasks/{file}"), contents);
    }

    /// Write raw `.state` text, valid JSON or not.
    pub fn write_state(&self, epic: &str, raw: &str) {
        self.write_artifact(epic, ".state", raw);
    }

    pub fn read_state(&self, epic: &str) -> Option<EpicState> {
        read_state(&self.workspace().epic(epic).state_path)
    }

    pub fn read_state_raw(&self, epic: &str) -> String {
        fs::read_to_string(self.workspace().epic(epic).state_path).expect("read state")
    }
}

impl Default for EpicFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal task file with a title and a status marker.
pub fn task_doc(title: &str, status: &str) -> String {
    format!("# {title}\n\n## Status: {status}\n\n## Steps\n- do the work\n")
}

/// Notifier that always succeeds and remembers what it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.delivered.borrow().iter().map(|n| n.title.clone()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.delivered
            .borrow()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify(&self, notification: &Notification) -> Result<()> {
        self.delivered.borrow_mut().push(notification.clone());
        Ok(())
    }
}

/// Session sink that records `(session_id, text)` pairs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: RefCell<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }
}

impl SessionSink for RecordingSink {
    fn send(&self, session_id: &str, text: &str) -> Result<()> {
        self.sent
            .borrow_mut()
            .push((session_id.to_string(), text.to_string()));
        Ok(())
    }
}
