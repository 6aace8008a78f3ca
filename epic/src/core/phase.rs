//! Phase inference and next-action hints.

use serde::Serialize;

use crate::core::resolver::TaskStats;

/// Coarse lifecycle stage of an epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    New,
    Spec,
    Research,
    Plan,
    Execute,
    Unknown,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::New => "new",
            Phase::Spec => "spec",
            Phase::Research => "research",
            Phase::Plan => "plan",
            Phase::Execute => "execute",
            Phase::Unknown => "unknown",
        }
    }

    /// Parse a recorded phase label. Anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "new" => Phase::New,
            "spec" => Phase::Spec,
            "research" => Phase::Research,
            "plan" => Phase::Plan,
            "execute" => Phase::Execute,
            _ => Phase::Unknown,
        }
    }
}

/// Which artifacts exist in an epic directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactPresence {
    pub spec: bool,
    pub research: bool,
    pub plan: bool,
    pub tasks: bool,
    pub state: bool,
}

/// Infer the phase from the most advanced artifact present.
pub fn infer_phase(artifacts: &ArtifactPresence) -> Phase {
    if artifacts.tasks {
        Phase::Execute
    } else if artifacts.plan {
        Phase::Plan
    } else if artifacts.research {
        Phase::Research
    } else if artifacts.spec {
        Phase::Spec
    } else {
        Phase::New
    }
}

/// Recorded phase label, falling back to inference when it is empty or `unknown`.
pub fn effective_phase(recorded: Option<&str>, artifacts: &ArtifactPresence) -> String {
    match recorded.filter(|label| !label.is_empty() && *label != Phase::Unknown.as_str()) {
        Some(label) => label.to_string(),
        None => infer_phase(artifacts).as_str().to_string(),
    }
}

/// Suggest what the user should do next with `epic`.
pub fn next_action(epic: &str, artifacts: &ArtifactPresence, stats: &TaskStats) -> String {
    if !artifacts.spec {
        format!("Create spec with `/epic {epic} spec`")
    } else if !artifacts.research {
        format!("Run `/epic {epic}` to start research")
    } else if !artifacts.plan {
        format!("Run `/epic {epic}` to create plan")
    } else if stats.pending > 0 || stats.in_progress > 0 {
        format!(
            "Run `/epic {epic}` to continue execution or `/epic {epic} yolo` for auto mode"
        )
    } else if stats.blocked > 0 {
        format!("{} task(s) blocked - review and unblock", stats.blocked)
    } else {
        "Epic complete!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presence(spec: bool, research: bool, plan: bool, tasks: bool) -> ArtifactPresence {
        ArtifactPresence {
            spec,
            research,
            plan,
            tasks,
            state: false,
        }
    }

    #[test]
    fn inference_picks_most_advanced_artifact() {
        assert_eq!(infer_phase(&presence(false, false, false, false)), Phase::New);
        assert_eq!(infer_phase(&presence(true, false, false, false)), Phase::Spec);
        assert_eq!(infer_phase(&presence(true, true, false, false)), Phase::Research);
        assert_eq!(infer_phase(&presence(true, true, true, false)), Phase::Plan);
        assert_eq!(infer_phase(&presence(false, false, false, true)), Phase::Execute);
    }

    #[test]
    fn recorded_phase_wins_unless_unknown() {
        let artifacts = presence(true, true, true, true);
        assert_eq!(effective_phase(Some("research"), &artifacts), "research");
        assert_eq!(effective_phase(Some("unknown"), &artifacts), "execute");
        assert_eq!(effective_phase(Some(""), &artifacts), "execute");
        assert_eq!(effective_phase(None, &presence(true, false, false, false)), "spec");
    }

    #[test]
    fn labels_round_trip() {
        for phase in [
            Phase::New,
            Phase::Spec,
            Phase::Research,
            Phase::Plan,
            Phase::Execute,
            Phase::Unknown,
        ] {
            assert_eq!(Phase::from_label(phase.as_str()), phase);
        }
        assert_eq!(Phase::from_label("review"), Phase::Unknown);
    }

    #[test]
    fn next_action_follows_artifact_order() {
        let stats = TaskStats::default();
        assert!(next_action("auth", &presence(false, false, false, false), &stats)
            .contains("/epic auth spec"));
        assert!(next_action("auth", &presence(true, false, false, false), &stats)
            .contains("start research"));
        assert!(next_action("auth", &presence(true, true, false, false), &stats)
            .contains("create plan"));
    }

    #[test]
    fn next_action_reflects_task_progress() {
        let artifacts = presence(true, true, true, true);
        let open = TaskStats {
            total: 2,
            done: 1,
            pending: 1,
            ..TaskStats::default()
        };
        assert!(next_action("auth", &artifacts, &open).contains("`/epic auth yolo`"));

        let stuck = TaskStats {
            total: 2,
            done: 1,
            blocked: 1,
            ..TaskStats::default()
        };
        assert_eq!(
            next_action("auth", &artifacts, &stuck),
            "1 task(s) blocked - review and unblock"
        );

        let finished = TaskStats {
            total: 2,
            done: 2,
            ..TaskStats::default()
        };
        assert_eq!(next_action("auth", &artifacts, &finished), "Epic complete!");
    }
}
