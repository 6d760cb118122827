use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entry::HierarchyEntry;

/// Where a field's current value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldPhase {
    #[default]
    Idle,
    /// Written by a descendant's selection; the UI has not echoed it back yet.
    AutoPopulating,
    /// Last written by the user typing.
    UserEditing,
}

/// Per-field provenance kept alongside the value map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldMetadata {
    pub stable_id: Option<String>,
    pub user_generated_id: Option<String>,
    /// Text at the time of the last selection or load.
    pub mirrored_value: Option<String>,
    #[serde(default)]
    pub phase: FieldPhase,
}

impl FieldMetadata {
    pub fn from_entry(entry: &HierarchyEntry, value: &str, phase: FieldPhase) -> Self {
        Self {
            stable_id: entry.stable_id.clone(),
            user_generated_id: entry.user_generated_id.clone(),
            mirrored_value: Some(value.to_string()),
            phase,
        }
    }

    /// Metadata for a value loaded from a saved record: known-good text, not
    /// yet re-validated against the live hierarchy.
    pub fn loaded(value: &str) -> Self {
        Self {
            stable_id: None,
            user_generated_id: Some(value.to_string()),
            mirrored_value: Some(value.to_string()),
            phase: FieldPhase::Idle,
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.stable_id.is_some()
    }

    pub fn has_identifier(&self) -> bool {
        self.stable_id.is_some() || self.user_generated_id.is_some()
    }

    pub fn diverges_from(&self, text: &str) -> bool {
        self.mirrored_value.as_deref() != Some(text)
    }

    pub(crate) fn forget_selection(&mut self) {
        self.stable_id = None;
        self.user_generated_id = None;
        self.mirrored_value = None;
    }
}
