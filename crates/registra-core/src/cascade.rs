//! The cascade store: owner of the address value map and its metadata.
//!
//! Every operation is synchronous and leaves the store consistent before it
//! returns. Only `select_entry` writes more than one field; only
//! `clear_descendants` removes descendant values. Ancestor edits leave
//! children alone even when they become stale, so downstream text the user
//! typed is never lost to a corrected state field.
//!
//! Value and metadata maps sit behind `Arc`s and are copied on write, so a
//! [`CascadeSnapshot`] is cheap to take and never changes after the fact.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::CascadeError;
use crate::models::address::{AddressValues, MetadataMap};
use crate::models::entry::HierarchyEntry;
use crate::models::level::LevelChain;
use crate::models::metadata::{FieldMetadata, FieldPhase};
use crate::strictness::StrictnessMap;

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CascadeSnapshot {
    pub values: Arc<AddressValues>,
    pub metadata: Arc<MetadataMap>,
}

#[derive(Debug, Clone)]
pub struct CascadeStore {
    levels: LevelChain,
    values: Arc<AddressValues>,
    metadata: Arc<MetadataMap>,
}

impl CascadeStore {
    pub fn new(levels: LevelChain) -> Self {
        Self {
            levels,
            values: Arc::default(),
            metadata: Arc::default(),
        }
    }

    pub fn levels(&self) -> &LevelChain {
        &self.levels
    }

    pub fn values(&self) -> &AddressValues {
        &self.values
    }

    pub fn value(&self, field_key: &str) -> Option<&str> {
        self.values.get(field_key)
    }

    pub fn metadata(&self, field_key: &str) -> Option<&FieldMetadata> {
        self.metadata.get(field_key)
    }

    pub fn phase(&self, field_key: &str) -> FieldPhase {
        self.metadata
            .get(field_key)
            .map(|m| m.phase)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> CascadeSnapshot {
        CascadeSnapshot {
            values: Arc::clone(&self.values),
            metadata: Arc::clone(&self.metadata),
        }
    }

    /// Select a confirmed hierarchy entry for `field_key` and fill ancestors
    /// from its parent chain.
    ///
    /// The walk pairs each parent link with the next level up. A named link
    /// is written; a nameless link that still carries a stable id is skipped
    /// (that ancestor keeps whatever it holds); a link with neither ends the
    /// walk. Descendant fields are never touched.
    ///
    /// Returns the ancestor field keys that were written, nearest first.
    pub fn select_entry(
        &mut self,
        field_key: &str,
        entry: &HierarchyEntry,
    ) -> Result<Vec<String>, CascadeError> {
        let position = self.levels.position(field_key)?;

        let value = entry.display_value().to_string();
        let metadata = FieldMetadata::from_entry(entry, &value, FieldPhase::Idle);
        self.write(field_key, Some(value), metadata);

        let mut populated = Vec::new();
        let levels = self.levels.clone();
        let ancestors = levels.levels()[..position].iter().rev();
        for (level, link) in ancestors.zip(entry.ancestors()) {
            if link.has_name() {
                let value = link.display_value().to_string();
                let metadata = FieldMetadata::from_entry(link, &value, FieldPhase::AutoPopulating);
                self.write(&level.field_key, Some(value), metadata);
                populated.push(level.field_key.clone());
            } else if link.stable_id.is_some() {
                continue;
            } else {
                debug!(
                    field_key = %field_key,
                    stopped_at = %level.field_key,
                    "ancestor chain ended early, leaving remaining ancestors untouched"
                );
                break;
            }
        }

        Ok(populated)
    }

    /// Record user-typed text for one field.
    ///
    /// Identifiers survive only while the text still matches what was last
    /// selected or loaded; the first divergent edit drops them.
    pub fn edit_freehand(&mut self, field_key: &str, text: &str) -> Result<(), CascadeError> {
        self.levels.position(field_key)?;

        Arc::make_mut(&mut self.values).set(field_key, Some(text.to_string()));

        let metadata = Arc::make_mut(&mut self.metadata)
            .entry(field_key.to_string())
            .or_default();
        if metadata.diverges_from(text) {
            metadata.forget_selection();
        }
        metadata.phase = FieldPhase::UserEditing;

        Ok(())
    }

    /// Explicitly clear one field's value and metadata.
    pub fn clear_field(&mut self, field_key: &str) -> Result<(), CascadeError> {
        self.levels.position(field_key)?;
        self.write(field_key, None, FieldMetadata::default());
        Ok(())
    }

    /// Clear every level more specific than `field_key`. The field itself and
    /// its ancestors are left as they are.
    pub fn clear_descendants(&mut self, field_key: &str) -> Result<(), CascadeError> {
        let levels = self.levels.clone();
        let descendants = levels.descendants(field_key)?;
        for level in descendants {
            self.write(&level.field_key, None, FieldMetadata::default());
        }
        debug!(field_key = %field_key, cleared = descendants.len(), "cleared descendant fields");
        Ok(())
    }

    /// Move an auto-populated field back to idle once the UI has echoed the
    /// programmatic write. Other phases are left alone.
    pub fn acknowledge(&mut self, field_key: &str) -> Result<(), CascadeError> {
        self.levels.position(field_key)?;
        if self.phase(field_key) == FieldPhase::AutoPopulating
            && let Some(metadata) = Arc::make_mut(&mut self.metadata).get_mut(field_key)
        {
            metadata.phase = FieldPhase::Idle;
        }
        Ok(())
    }

    pub fn reset_all(&mut self) {
        self.values = Arc::default();
        self.metadata = Arc::default();
        info!("address cascade reset");
    }

    /// Replace the value map wholesale, e.g. with a saved patient address.
    ///
    /// Non-empty values are marked with `user_generated_id = value` and no
    /// stable id. Keys that are not configured levels are dropped.
    pub fn bulk_set(&mut self, values: AddressValues) {
        let mut next = AddressValues::new();
        let mut metadata = MetadataMap::new();

        for (field_key, value) in values {
            if !self.levels.contains(&field_key) {
                warn!(field_key = %field_key, "ignoring saved value for unconfigured level");
                continue;
            }
            if let Some(text) = value.as_deref().filter(|t| !t.trim().is_empty()) {
                metadata.insert(field_key.clone(), FieldMetadata::loaded(text));
            }
            next.set(field_key, value);
        }

        info!(fields = next.len(), "loaded saved address");
        self.values = Arc::new(next);
        self.metadata = Arc::new(metadata);
    }

    /// Whether `field_key`, if strict and non-empty, carries a stable id or a
    /// user-generated id. Non-strict and empty fields always pass.
    pub fn is_resolved(
        &self,
        field_key: &str,
        strictness: &StrictnessMap,
    ) -> Result<bool, CascadeError> {
        self.levels.position(field_key)?;
        if !strictness.is_strict(field_key) || self.values.is_blank(field_key) {
            return Ok(true);
        }
        Ok(self
            .metadata
            .get(field_key)
            .is_some_and(FieldMetadata::has_identifier))
    }

    fn write(&mut self, field_key: &str, value: Option<String>, metadata: FieldMetadata) {
        Arc::make_mut(&mut self.values).set(field_key, value);
        Arc::make_mut(&mut self.metadata).insert(field_key.to_string(), metadata);
    }
}
