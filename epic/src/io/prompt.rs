//! Task context prompt rendering.
//!
//! The section order and fixed framing text are a contract with whatever
//! executor consumes the prompt. Rendering is a pure function of its inputs,
//! so the same artifacts always yield byte-identical output.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

const TASK_CONTEXT_TEMPLATE: &str = include_str!("prompts/task_context.md");

/// Separator placed between embedded previous-task blocks.
const PREVIOUS_TASK_SEPARATOR: &str = "\n\n---\n\n";

/// A task embedded verbatim as earlier context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousTask {
    pub file: String,
    pub content: String,
}

/// Everything needed to render the execution prompt for one task.
#[derive(Debug, Clone)]
pub struct TaskContextInputs {
    pub epic: String,
    pub task_id: String,
    /// Project-relative path shown to the executor, e.g. `.epics/auth/tasks/02-api.md`.
    pub task_label: String,
    pub task_content: String,
    pub spec: String,
    /// Empty means "not written yet" and renders a placeholder.
    pub research: String,
    pub plan: String,
    /// Tasks with a lower id, ascending.
    pub previous_tasks: Vec<PreviousTask>,
}

/// Render the task context prompt.
pub fn render_task_context(input: &TaskContextInputs) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("task_context", TASK_CONTEXT_TEMPLATE)
        .context("load task context template")?;
    let template = env
        .get_template("task_context")
        .context("get task context template")?;

    let previous_tasks = join_previous_tasks(&input.previous_tasks);
    let rendered = template
        .render(context! {
            epic => input.epic,
            task_id => input.task_id,
            task_label => input.task_label,
            task_content => input.task_content,
            spec => input.spec,
            research => input.research,
            plan => input.plan,
            previous_tasks => previous_tasks,
        })
        .context("render task context")?;
    Ok(rendered)
}

fn join_previous_tasks(tasks: &[PreviousTask]) -> String {
    tasks
        .iter()
        .map(|task| format!("### {}\n\n{}", task.file, task.content))
        .collect::<Vec<_>>()
        .join(PREVIOUS_TASK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> TaskContextInputs {
        TaskContextInputs {
            epic: "auth".to_string(),
            task_id: "02".to_string(),
            task_label: ".epics/auth/tasks/02-api.md".to_string(),
            task_content: "# API\n\n## Status: pending\n".to_string(),
            spec: "SPEC BODY".to_string(),
            research: "RESEARCH BODY".to_string(),
            plan: "PLAN BODY".to_string(),
            previous_tasks: vec![PreviousTask {
                file: "01-setup.md".to_string(),
                content: "SETUP BODY".to_string(),
            }],
        }
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {needle:?}"))
    }

    /// Order matters to the executor: mission -> spec -> research -> plan ->
    /// previous tasks -> current task -> instructions.
    #[test]
    fn sections_render_in_fixed_order() {
        let prompt = render_task_context(&inputs()).expect("render");

        let order = [
            "# Execute Epic Task",
            "You are executing task 02 of epic \"auth\".",
            "## Your Mission",
            "## Epic Spec\n\nSPEC BODY",
            "## Research\n\nRESEARCH BODY",
            "## Plan\n\nPLAN BODY",
            "## Previous Completed Tasks\n\n### 01-setup.md\n\nSETUP BODY",
            "## Current Task to Execute\n\n**File: .epics/auth/tasks/02-api.md**\n\n# API",
            "## Instructions",
        ];
        let positions: Vec<usize> = order.iter().map(|n| position(&prompt, n)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(prompt.ends_with("6. When complete, confirm what was done\n"));
    }

    #[test]
    fn missing_optional_sections_use_placeholders() {
        let input = TaskContextInputs {
            research: String::new(),
            plan: String::new(),
            previous_tasks: Vec::new(),
            ..inputs()
        };
        let prompt = render_task_context(&input).expect("render");
        assert!(prompt.contains("## Research\n\n(No research conducted yet)\n"));
        assert!(prompt.contains("## Plan\n\n(No plan created yet)\n"));
        assert!(prompt.contains("## Previous Completed Tasks\n\n(This is the first task)\n"));
    }

    #[test]
    fn previous_tasks_are_separated_by_rules() {
        let input = TaskContextInputs {
            previous_tasks: vec![
                PreviousTask {
                    file: "01-a.md".to_string(),
                    content: "A".to_string(),
                },
                PreviousTask {
                    file: "02-b.md".to_string(),
                    content: "B".to_string(),
                },
            ],
            ..inputs()
        };
        let prompt = render_task_context(&input).expect("render");
        assert!(prompt.contains("### 01-a.md\n\nA\n\n---\n\n### 02-b.md\n\nB"));
    }

    /// Template syntax inside artifacts is data, not markup.
    #[test]
    fn artifact_text_is_not_interpreted() {
        let input = TaskContextInputs {
            spec: "use {{ handlebars }} and {% raw %}".to_string(),
            ..inputs()
        };
        let prompt = render_task_context(&input).expect("render");
        assert!(prompt.contains("use {{ handlebars }} and {% raw %}"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render_task_context(&inputs()).expect("render");
        let second = render_task_context(&inputs()).expect("render");
        assert_eq!(first, second);
    }
}
