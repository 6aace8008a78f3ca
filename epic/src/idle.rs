//! Continuation controller: one decision per idle signal from the host.
//!
//! Each tick finds the first epic (by name) with an active yolo session,
//! counts its remaining tasks and either completes it, stops it at the
//! iteration bound, or advances the iteration and asks the host session to
//! keep going. Nothing here returns an error: a tick that cannot decide
//! safely is skipped and the next idle signal tries again.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::grammar::TaskGrammar;
use crate::core::resolver::remaining_count;
use crate::core::state::YoloState;
use crate::core::yolo::{YoloDecision, continuation_message, decide};
use crate::io::artifacts::{list_epic_names, load_tasks};
use crate::io::notify::{Notification, Notifier, notify_best_effort};
use crate::io::paths::{EpicPaths, Workspace};
use crate::io::session::SessionSink;
use crate::io::state_store::{read_state, write_state};

/// Idle event delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdleSignal {
    /// Session to send the continuation instruction to, when the host has one.
    pub session_id: Option<String>,
}

/// What one controller tick did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IdleOutcome {
    NoActiveEpic,
    Completed {
        epic: String,
    },
    Stopped {
        epic: String,
        max_iterations: u32,
        remaining: usize,
    },
    Continued {
        epic: String,
        iteration: u32,
        remaining: usize,
        /// Whether an instruction was delivered to the session.
        sent: bool,
    },
    Skipped {
        epic: Option<String>,
        reason: String,
    },
}

/// The epic whose yolo session is active.
#[derive(Debug, Clone)]
pub struct ActiveEpic {
    pub paths: EpicPaths,
    pub yolo: YoloState,
}

/// First epic in name order whose state has `yolo.active`. At most one per tick.
pub fn find_active_yolo_epic(ws: &Workspace) -> Result<Option<ActiveEpic>> {
    if !ws.epics_dir.exists() {
        return Ok(None);
    }
    for name in list_epic_names(&ws.epics_dir)? {
        let paths = ws.epic(&name);
        let Some(state) = read_state(&paths.state_path) else {
            continue;
        };
        if let Some(yolo) = state.yolo.filter(|yolo| yolo.active) {
            debug!(epic = %name, "active yolo epic");
            return Ok(Some(ActiveEpic { paths, yolo }));
        }
    }
    Ok(None)
}

/// Tasks that are neither done nor explicitly blocked.
pub fn count_remaining(epic: &EpicPaths, grammar: &impl TaskGrammar) -> Result<usize> {
    let tasks = load_tasks(epic, grammar)?;
    Ok(remaining_count(tasks.iter().map(|record| &record.status)))
}

/// Run one controller tick.
pub fn on_idle<G, N, S>(
    ws: &Workspace,
    signal: &IdleSignal,
    grammar: &G,
    notifier: &N,
    sink: &S,
) -> IdleOutcome
where
    G: TaskGrammar,
    N: Notifier + ?Sized,
    S: SessionSink + ?Sized,
{
    let active = match find_active_yolo_epic(ws) {
        Ok(Some(active)) => active,
        Ok(None) => return IdleOutcome::NoActiveEpic,
        Err(err) => {
            warn!(err = %format!("{err:#}"), "could not scan epics, skipping idle tick");
            return IdleOutcome::Skipped {
                epic: None,
                reason: format!("{err:#}"),
            };
        }
    };
    let ActiveEpic { paths, yolo } = active;
    let epic = paths.name.clone();

    let remaining = match count_remaining(&paths, grammar) {
        Ok(remaining) => remaining,
        Err(err) => {
            warn!(epic = %epic, err = %format!("{err:#}"), "could not count tasks, skipping idle tick");
            return IdleOutcome::Skipped {
                epic: Some(epic),
                reason: format!("{err:#}"),
            };
        }
    };

    info!(
        epic = %epic,
        remaining,
        iteration = yolo.iteration,
        max_iterations = %max_label(&yolo),
        "yolo check"
    );

    let decision = decide(&yolo, remaining);
    write_state(&paths.state_path, &epic, &decision.state_update());

    match decision {
        YoloDecision::Complete => {
            notify_best_effort(
                notifier,
                &Notification::new("Epic Complete", format!("Epic \"{epic}\" finished successfully!")),
            );
            info!(epic = %epic, "epic completed, all tasks done");
            IdleOutcome::Completed { epic }
        }
        YoloDecision::IterationLimit { max_iterations } => {
            notify_best_effort(
                notifier,
                &Notification::new(
                    "Epic Stopped",
                    format!("Epic \"{epic}\" hit max iterations ({max_iterations})"),
                ),
            );
            warn!(
                epic = %epic,
                max_iterations,
                remaining,
                "epic stopped: max iterations reached with tasks remaining"
            );
            IdleOutcome::Stopped {
                epic,
                max_iterations,
                remaining,
            }
        }
        YoloDecision::Continue {
            next_iteration,
            max_iterations,
        } => {
            let sent = match signal.session_id.as_deref() {
                Some(session_id) => {
                    let text = continuation_message(&epic, remaining, next_iteration, max_iterations);
                    match sink.send(session_id, &text) {
                        Ok(()) => {
                            info!(epic = %epic, iteration = next_iteration, remaining, "epic continuing");
                            true
                        }
                        Err(err) => {
                            warn!(epic = %epic, session_id, err = %format!("{err:#}"), "continuation not delivered");
                            false
                        }
                    }
                }
                None => {
                    debug!(epic = %epic, "no session id, continuation not sent");
                    false
                }
            };
            IdleOutcome::Continued {
                epic,
                iteration: next_iteration,
                remaining,
                sent,
            }
        }
    }
}

fn max_label(yolo: &YoloState) -> String {
    if yolo.is_bounded() {
        yolo.max_iterations.to_string()
    } else {
        "unlimited".to_string()
    }
}
