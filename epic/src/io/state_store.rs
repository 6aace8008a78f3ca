//! Best-effort persistence for `.epics/<name>/.state`.
//!
//! Reads never fail outward: a missing or corrupt file is simply no state.
//! Writes are read-modify-write and swallow failures after logging them; the
//! continuation loop re-derives the same decision on its next tick.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::core::state::{EpicState, EpicStateUpdate, apply_update};
use crate::io::artifacts::write_atomic;

/// Load the state record, or `None` when it is missing or unparsable.
pub fn read_state(path: &Path) -> Option<EpicState> {
    match load_state(path) {
        Ok(state) => state,
        Err(err) => {
            debug!(path = %path.display(), err = %format!("{err:#}"), "ignoring unreadable state");
            None
        }
    }
}

/// Merge `update` into the state of `epic` and write it back.
///
/// Returns the written record, or `None` if nothing was written. A missing
/// file starts from [`EpicState::named`]; a corrupt one is left untouched.
pub fn write_state(path: &Path, epic: &str, update: &EpicStateUpdate) -> Option<EpicState> {
    match merge_and_write(path, epic, update) {
        Ok(state) => Some(state),
        Err(err) => {
            warn!(epic, path = %path.display(), err = %format!("{err:#}"), "state write skipped");
            None
        }
    }
}

/// Current time as stored in `lastUpdated` (RFC 3339, UTC, milliseconds).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn load_state(path: &Path) -> Result<Option<EpicState>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read state {}", path.display())),
    };
    let state = serde_json::from_str(&contents)
        .with_context(|| format!("parse state {}", path.display()))?;
    Ok(Some(state))
}

fn merge_and_write(path: &Path, epic: &str, update: &EpicStateUpdate) -> Result<EpicState> {
    let mut state = match load_state(path) {
        Ok(Some(state)) => state,
        Ok(None) => EpicState::named(epic),
        Err(err) => return Err(anyhow!("refusing to overwrite unreadable state: {err:#}")),
    };
    apply_update(&mut state, update, &now_timestamp());

    debug!(epic, path = %path.display(), yolo = ?state.yolo, "writing state");
    let mut buf = serde_json::to_string_pretty(&state).context("serialize state")?;
    buf.push('\n');
    write_atomic(path, &buf)?;
    Ok(state)
}
