//! Text grammar for task artifacts.
//!
//! Resolution logic only sees statuses and dependency graphs. How those are
//! read out of artifact text is decided by a [`TaskGrammar`], so the markdown
//! markers can be swapped for another format without touching the resolver.

use crate::core::dependencies::{DependencyGraph, parse_dependencies};
use crate::core::status::parse_status;
use crate::core::types::TaskStatus;

pub trait TaskGrammar {
    /// Status of a task given its full file content.
    fn status_of(&self, task_text: &str) -> TaskStatus;
    /// Dependency graph declared by the plan artifact.
    fn dependencies_of(&self, plan_text: &str) -> DependencyGraph;
}

/// `## Status: <state>` markers and a `## Dependencies` list in `plan.md`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownGrammar;

impl TaskGrammar for MarkdownGrammar {
    fn status_of(&self, task_text: &str) -> TaskStatus {
        parse_status(task_text)
    }

    fn dependencies_of(&self, plan_text: &str) -> DependencyGraph {
        parse_dependencies(plan_text)
    }
}
