//! Availability resolution over task statuses and declared dependencies.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::dependencies::DependencyGraph;
use crate::core::types::{TaskRecord, TaskStatus};

/// An open task whose prerequisites are all done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTask {
    pub task_id: String,
    pub file: String,
    pub status: TaskStatus,
}

/// An open task waiting on at least one prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedTask {
    pub task_id: String,
    pub file: String,
    /// Prerequisite ids that are not `done`, in declaration order.
    pub blocked_by: Vec<String>,
}

/// Partition of open tasks. Done and explicitly blocked tasks appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: Vec<AvailableTask>,
    pub blocked: Vec<BlockedTask>,
}

/// Per-status task counts for an epic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub blocked: usize,
}

/// Split open tasks into available and dependency-blocked.
///
/// `tasks` must already be in ascending id order; output preserves it. A
/// prerequisite with no matching task counts as not done.
pub fn resolve_availability(tasks: &[TaskRecord], graph: &DependencyGraph) -> Availability {
    let statuses: HashMap<&str, TaskStatus> = tasks
        .iter()
        .map(|record| (record.task.id.as_str(), record.status))
        .collect();

    let mut availability = Availability::default();
    for record in tasks {
        if !record.status.is_open() {
            continue;
        }

        let unmet: Vec<String> = graph
            .prerequisites(&record.task.id)
            .iter()
            .filter(|dep| statuses.get(dep.as_str()) != Some(&TaskStatus::Done))
            .cloned()
            .collect();

        if unmet.is_empty() {
            availability.available.push(AvailableTask {
                task_id: record.task.id.clone(),
                file: record.task.file.clone(),
                status: record.status,
            });
        } else {
            availability.blocked.push(BlockedTask {
                task_id: record.task.id.clone(),
                file: record.task.file.clone(),
                blocked_by: unmet,
            });
        }
    }

    availability
}

/// Tasks that are neither `done` nor `blocked`, ignoring dependency availability.
pub fn remaining_count<'a>(statuses: impl IntoIterator<Item = &'a TaskStatus>) -> usize {
    statuses
        .into_iter()
        .filter(|status| !matches!(status, TaskStatus::Done | TaskStatus::Blocked))
        .count()
}

pub fn task_stats<'a>(statuses: impl IntoIterator<Item = &'a TaskStatus>) -> TaskStats {
    let mut stats = TaskStats::default();
    for status in statuses {
        stats.total += 1;
        match status {
            TaskStatus::Done => stats.done += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Blocked => stats.blocked += 1,
            TaskStatus::Pending => stats.pending += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dependencies::parse_dependencies;
    use crate::core::types::TaskFile;

    fn record(file: &str, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            task: TaskFile::from_file_name(file),
            status,
        }
    }

    fn sample() -> Vec<TaskRecord> {
        vec![
            record("01-setup.md", TaskStatus::Done),
            record("02-model.md", TaskStatus::Pending),
            record("03-api.md", TaskStatus::Pending),
            record("04-docs.md", TaskStatus::Blocked),
        ]
    }

    #[test]
    fn partitions_chain_with_blocked_leaf() {
        let graph = parse_dependencies("## Dependencies\n- 02: [01]\n- 03: [02]\n");
        let availability = resolve_availability(&sample(), &graph);

        assert_eq!(
            availability.available,
            vec![AvailableTask {
                task_id: "02".to_string(),
                file: "02-model.md".to_string(),
                status: TaskStatus::Pending,
            }]
        );
        assert_eq!(
            availability.blocked,
            vec![BlockedTask {
                task_id: "03".to_string(),
                file: "03-api.md".to_string(),
                blocked_by: vec!["02".to_string()],
            }]
        );
    }

    /// Dependency-blocked pending tasks still count; explicitly blocked ones do not.
    #[test]
    fn remaining_ignores_dependency_availability() {
        let tasks = sample();
        let statuses: Vec<TaskStatus> = tasks.iter().map(|r| r.status).collect();
        assert_eq!(remaining_count(&statuses), 2);
    }

    #[test]
    fn in_progress_tasks_can_be_available() {
        let tasks = vec![record("01-a.md", TaskStatus::InProgress)];
        let availability = resolve_availability(&tasks, &DependencyGraph::new());
        assert_eq!(availability.available[0].status, TaskStatus::InProgress);
        assert!(availability.blocked.is_empty());
    }

    #[test]
    fn unknown_prerequisite_blocks() {
        let tasks = vec![record("02-a.md", TaskStatus::Pending)];
        let graph = parse_dependencies("## Dependencies\n- 02: [01, 07]\n");
        let availability = resolve_availability(&tasks, &graph);
        assert_eq!(
            availability.blocked[0].blocked_by,
            vec!["01".to_string(), "07".to_string()]
        );
    }

    /// Cycles never error; both tasks simply stay blocked.
    #[test]
    fn cycle_blocks_permanently() {
        let tasks = vec![
            record("01-a.md", TaskStatus::Pending),
            record("02-b.md", TaskStatus::Pending),
        ];
        let graph = parse_dependencies("## Dependencies\n- 01: [02]\n- 02: [01]\n");
        let availability = resolve_availability(&tasks, &graph);
        assert!(availability.available.is_empty());
        assert_eq!(availability.blocked.len(), 2);
    }

    #[test]
    fn stats_count_every_status() {
        let tasks = sample();
        let stats = task_stats(tasks.iter().map(|r| &r.status));
        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                done: 1,
                in_progress: 0,
                pending: 2,
                blocked: 1,
            }
        );
    }
}
