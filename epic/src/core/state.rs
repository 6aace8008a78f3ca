//! The per-epic `.state` record and its merge rules.
//!
//! The record is written by more than one tool, so fields this crate does not
//! model are kept in [`EpicState::extra`] and written back untouched. Updates
//! merge shallowly, except for `yolo`, whose sub-fields merge one by one so an
//! iteration bump cannot clear `active` or `maxIterations`. A JSON `null` in
//! any modelled field reads as that field's default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Persisted state of one epic (`.epics/<name>/.state`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EpicState {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Recorded phase label. Kept verbatim; see [`crate::core::phase::Phase`].
    #[serde(deserialize_with = "null_as_default")]
    pub current_phase: String,
    #[serde(deserialize_with = "null_as_default")]
    pub spec_complete: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub research_complete: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub plan_complete: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub execute_complete: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yolo: Option<YoloState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EpicState {
    /// Fresh record for an epic that has no `.state` yet.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_phase: "unknown".to_string(),
            ..Self::default()
        }
    }

    pub fn yolo_active(&self) -> bool {
        self.yolo.as_ref().is_some_and(|yolo| yolo.active)
    }
}

/// Autonomous-continuation sub-record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YoloState {
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub iteration: u32,
    /// 0 means unbounded.
    #[serde(deserialize_with = "null_as_default")]
    pub max_iterations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
}

impl YoloState {
    pub fn is_bounded(&self) -> bool {
        self.max_iterations > 0
    }
}

/// Partial update for [`EpicState`]. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicStateUpdate {
    pub current_phase: Option<String>,
    pub spec_complete: Option<bool>,
    pub research_complete: Option<bool>,
    pub plan_complete: Option<bool>,
    pub execute_complete: Option<bool>,
    pub yolo: Option<YoloUpdate>,
}

/// Partial update for [`YoloState`], merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YoloUpdate {
    pub active: Option<bool>,
    pub iteration: Option<u32>,
    pub max_iterations: Option<u32>,
    pub started_at: Option<String>,
}

/// Merge `update` into `state` and stamp `last_updated` with `now`.
pub fn apply_update(state: &mut EpicState, update: &EpicStateUpdate, now: &str) {
    if let Some(phase) = &update.current_phase {
        state.current_phase = phase.clone();
    }
    set_if_some(&mut state.spec_complete, update.spec_complete);
    set_if_some(&mut state.research_complete, update.research_complete);
    set_if_some(&mut state.plan_complete, update.plan_complete);
    set_if_some(&mut state.execute_complete, update.execute_complete);

    if let Some(yolo_update) = &update.yolo {
        let yolo = state.yolo.get_or_insert_with(YoloState::default);
        set_if_some(&mut yolo.active, yolo_update.active);
        set_if_some(&mut yolo.iteration, yolo_update.iteration);
        set_if_some(&mut yolo.max_iterations, yolo_update.max_iterations);
        if let Some(started_at) = &yolo_update.started_at {
            yolo.started_at = Some(started_at.clone());
        }
    }

    state.last_updated = now.to_string();
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn set_if_some<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yolo_state(active: bool, iteration: u32, max_iterations: u32) -> EpicState {
        EpicState {
            yolo: Some(YoloState {
                active,
                iteration,
                max_iterations,
                started_at: Some("2026-01-01T00:00:00.000Z".to_string()),
            }),
            ..EpicState::named("auth")
        }
    }

    #[test]
    fn iteration_update_preserves_other_yolo_fields() {
        let mut state = yolo_state(true, 4, 10);
        let update = EpicStateUpdate {
            yolo: Some(YoloUpdate {
                iteration: Some(5),
                ..YoloUpdate::default()
            }),
            ..EpicStateUpdate::default()
        };

        apply_update(&mut state, &update, "now");

        let yolo = state.yolo.expect("yolo");
        assert!(yolo.active);
        assert_eq!(yolo.iteration, 5);
        assert_eq!(yolo.max_iterations, 10);
        assert_eq!(yolo.started_at.as_deref(), Some("2026-01-01T00:00:00.000Z"));
        assert_eq!(state.last_updated, "now");
    }

    #[test]
    fn shallow_fields_merge_and_yolo_untouched_when_absent() {
        let mut state = yolo_state(true, 2, 0);
        let update = EpicStateUpdate {
            execute_complete: Some(true),
            ..EpicStateUpdate::default()
        };

        apply_update(&mut state, &update, "t1");

        assert!(state.execute_complete);
        assert!(!state.plan_complete);
        assert_eq!(state.yolo, yolo_state(true, 2, 0).yolo);
    }

    #[test]
    fn yolo_update_without_existing_record_starts_from_defaults() {
        let mut state = EpicState::named("auth");
        let update = EpicStateUpdate {
            yolo: Some(YoloUpdate {
                iteration: Some(1),
                ..YoloUpdate::default()
            }),
            ..EpicStateUpdate::default()
        };

        apply_update(&mut state, &update, "t1");

        assert_eq!(
            state.yolo,
            Some(YoloState {
                active: false,
                iteration: 1,
                max_iterations: 0,
                started_at: None,
            })
        );
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = r#"{"name":"auth","currentPhase":"plan","reviewer":"sam","yolo":{"active":true,"iteration":1}}"#;
        let state: EpicState = serde_json::from_str(raw).expect("parse");
        assert_eq!(state.current_phase, "plan");
        assert_eq!(state.yolo.as_ref().map(|y| y.max_iterations), Some(0));
        assert_eq!(state.extra.get("reviewer"), Some(&Value::from("sam")));

        let written = serde_json::to_value(&state).expect("serialize");
        assert_eq!(written["reviewer"], "sam");
        assert_eq!(written["yolo"]["maxIterations"], 0);
    }

    #[test]
    fn missing_yolo_is_not_serialized() {
        let written = serde_json::to_value(EpicState::named("auth")).expect("serialize");
        assert!(written.get("yolo").is_none());
        assert_eq!(written["currentPhase"], "unknown");
        assert_eq!(written["executeComplete"], false);
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let raw = r#"{"name":null,"currentPhase":null,"executeComplete":null,"lastUpdated":null,
                      "yolo":{"active":true,"iteration":null,"maxIterations":null,"startedAt":null}}"#;
        let state: EpicState = serde_json::from_str(raw).expect("parse");
        assert_eq!(state.name, "");
        assert_eq!(state.current_phase, "");
        assert!(!state.execute_complete);
        assert_eq!(state.last_updated, "");
        assert_eq!(
            state.yolo,
            Some(YoloState {
                active: true,
                iteration: 0,
                max_iterations: 0,
                started_at: None,
            })
        );
        assert!(!state.yolo.expect("yolo").is_bounded());
    }
}
