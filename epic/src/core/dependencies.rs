//! Dependency declarations from the plan artifact.
//!
//! The plan carries one `## Dependencies` section, ending at the next `##`
//! heading or the end of the text, with lines of the form:
//!
//! ```text
//! - 03: [01, 02]
//! - 04: []
//! ```
//!
//! Lines that do not match are skipped. No cycle detection is performed.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const SECTION_HEADER: &str = "## Dependencies\n";
const SECTION_END: &str = "\n##";

static DEPENDENCY_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s*(\d+):\s*\[(.*)\]").expect("dependency line regex should compile")
});

/// Task id → ordered prerequisite ids. Ids without an entry have no prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the prerequisites of `task_id`, replacing an earlier declaration.
    pub fn insert(&mut self, task_id: impl Into<String>, prerequisites: Vec<String>) {
        self.edges.insert(task_id.into(), prerequisites);
    }

    pub fn prerequisites(&self, task_id: &str) -> &[String] {
        self.edges.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }
}

/// Parse the `## Dependencies` section of `plan` into a graph.
///
/// A plan without the section yields an empty graph.
pub fn parse_dependencies(plan: &str) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let Some(body) = dependencies_section(plan) else {
        return graph;
    };

    for line in body.trim().split('\n') {
        let Some(caps) = DEPENDENCY_LINE_RE.captures(line) else {
            continue;
        };
        let task_id = &caps[1];
        let prerequisites = caps[2]
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        graph.insert(task_id, prerequisites);
    }

    graph
}

fn dependencies_section(plan: &str) -> Option<&str> {
    let start = plan.find(SECTION_HEADER)? + SECTION_HEADER.len();
    let rest = &plan[start..];
    let end = rest.find(SECTION_END).unwrap_or(rest.len());
    Some(&rest[..end])
}
