//! Task status markers.
//!
//! A task file declares its state with a literal `## Status: <state>` line.
//! Matching is byte-for-byte; when several markers are present the first one
//! in precedence order wins: `done` > `in-progress` > `blocked`.

use crate::core::types::TaskStatus;

pub const DONE_MARKER: &str = "## Status: done";
pub const IN_PROGRESS_MARKER: &str = "## Status: in-progress";
pub const BLOCKED_MARKER: &str = "## Status: blocked";

/// Parse the status of a task from its raw file content.
///
/// Total: text without any marker is `pending`.
pub fn parse_status(text: &str) -> TaskStatus {
    if text.contains(DONE_MARKER) {
        TaskStatus::Done
    } else if text.contains(IN_PROGRESS_MARKER) {
        TaskStatus::InProgress
    } else if text.contains(BLOCKED_MARKER) {
        TaskStatus::Blocked
    } else {
        TaskStatus::Pending
    }
}
