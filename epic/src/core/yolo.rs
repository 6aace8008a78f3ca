//! Decision rules for one autonomous-continuation tick.
//!
//! An active epic leaves yolo mode exactly once: when no work remains, or when
//! the iteration bound is reached. Otherwise the iteration advances by one.

use crate::core::state::{EpicStateUpdate, YoloState, YoloUpdate};

/// What the controller should do for the active epic on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YoloDecision {
    /// No remaining tasks: mark execution complete and leave yolo mode.
    Complete,
    /// Iteration bound reached with work left: leave yolo mode.
    IterationLimit { max_iterations: u32 },
    /// Keep going with the next iteration.
    Continue {
        next_iteration: u32,
        max_iterations: u32,
    },
}

impl YoloDecision {
    /// State change to persist for this decision.
    pub fn state_update(&self) -> EpicStateUpdate {
        match *self {
            YoloDecision::Complete => EpicStateUpdate {
                execute_complete: Some(true),
                yolo: Some(deactivate()),
                ..EpicStateUpdate::default()
            },
            YoloDecision::IterationLimit { .. } => EpicStateUpdate {
                yolo: Some(deactivate()),
                ..EpicStateUpdate::default()
            },
            YoloDecision::Continue { next_iteration, .. } => EpicStateUpdate {
                yolo: Some(YoloUpdate {
                    iteration: Some(next_iteration),
                    ..YoloUpdate::default()
                }),
                ..EpicStateUpdate::default()
            },
        }
    }
}

fn deactivate() -> YoloUpdate {
    YoloUpdate {
        active: Some(false),
        ..YoloUpdate::default()
    }
}

/// Decide the transition for an active epic with `remaining` open tasks.
///
/// Completion is checked before the bound, so an epic that finishes on its
/// last allowed iteration is still reported complete.
pub fn decide(yolo: &YoloState, remaining: usize) -> YoloDecision {
    if remaining == 0 {
        return YoloDecision::Complete;
    }
    if yolo.is_bounded() && yolo.iteration >= yolo.max_iterations {
        return YoloDecision::IterationLimit {
            max_iterations: yolo.max_iterations,
        };
    }
    YoloDecision::Continue {
        next_iteration: yolo.iteration.saturating_add(1),
        max_iterations: yolo.max_iterations,
    }
}

/// `3/4` when bounded, `3` otherwise.
pub fn iteration_label(iteration: u32, max_iterations: u32) -> String {
    if max_iterations > 0 {
        format!("{iteration}/{max_iterations}")
    } else {
        iteration.to_string()
    }
}

/// Instruction sent back into the host session to keep the agent working.
pub fn continuation_message(
    epic: &str,
    remaining: usize,
    iteration: u32,
    max_iterations: u32,
) -> String {
    format!(
        "Continue executing epic \"{epic}\". {remaining} task(s) remaining. [Iteration {}]",
        iteration_label(iteration, max_iterations)
    )
}
