use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use registra_core::cascade::{CascadeSnapshot, CascadeStore};
use registra_core::config::AddressConfig;
use registra_core::models::address::AddressValues;
use registra_core::models::entry::HierarchyEntry;
use registra_core::models::level::LevelChain;
use registra_core::models::metadata::FieldPhase;
use registra_core::read_only;
use registra_core::strictness::{StrictnessMap, resolve_strictness};
use registra_core::validation::{self, FieldValidationError};
use registra_suggest::coordinator::SuggestionCoordinator;
use registra_suggest::lookup::HierarchyLookup;

use crate::error::SessionError;
use crate::levels::load_levels;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Also clear the values of every more specific level.
    pub clear_descendants: bool,
}

/// What the rendering layer needs to draw the address section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub cascade: CascadeSnapshot,
    pub read_only: BTreeMap<String, bool>,
}

/// One patient's address form.
///
/// Reset between patients with [`AddressSession::reset_all`] rather than
/// rebuilt; level configuration and strictness stay fixed for its lifetime.
pub struct AddressSession {
    config: AddressConfig,
    strictness: StrictnessMap,
    store: CascadeStore,
    suggestions: SuggestionCoordinator,
}

impl AddressSession {
    /// Fetch levels from `lookup` (falling back to `fallback`) and build a
    /// session. Must be called inside a Tokio runtime.
    pub async fn start(
        lookup: Arc<dyn HierarchyLookup>,
        config: AddressConfig,
        fallback: LevelChain,
    ) -> Result<Self, SessionError> {
        let levels = load_levels(lookup.as_ref(), fallback).await;
        Self::with_levels(lookup, config, levels)
    }

    /// Build a session over an already known level set.
    pub fn with_levels(
        lookup: Arc<dyn HierarchyLookup>,
        config: AddressConfig,
        levels: LevelChain,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let strictness = resolve_strictness(&levels, config.strict_from_level.as_deref());
        let suggestions =
            SuggestionCoordinator::new(lookup, levels.clone(), strictness.clone(), &config)?;

        info!(
            levels = levels.len(),
            strict = strictness.strict_keys().count(),
            top_down = config.display_top_down,
            "address session started"
        );

        Ok(Self {
            config,
            strictness,
            store: CascadeStore::new(levels),
            suggestions,
        })
    }

    pub fn config(&self) -> &AddressConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelChain {
        self.store.levels()
    }

    pub fn strictness(&self) -> &StrictnessMap {
        &self.strictness
    }

    pub fn store(&self) -> &CascadeStore {
        &self.store
    }

    pub fn values(&self) -> &AddressValues {
        self.store.values()
    }

    pub fn suggestions(&self, field_key: &str) -> Arc<[HierarchyEntry]> {
        self.suggestions.suggestions(field_key)
    }

    /// A hierarchy entry was picked from `field_key`'s dropdown.
    ///
    /// Ancestors are filled from the entry's parent chain. Suggestion lists
    /// of the ancestors it wrote and of every level below the field are
    /// dropped, since they no longer describe those values.
    pub fn select(
        &mut self,
        field_key: &str,
        entry: &HierarchyEntry,
        options: SelectOptions,
    ) -> Result<(), SessionError> {
        let populated = self.store.select_entry(field_key, entry)?;
        self.suggestions.cancel(field_key);
        for ancestor in &populated {
            self.suggestions.clear_suggestions(ancestor)?;
        }
        self.suggestions.clear_descendant_suggestions(field_key)?;
        if options.clear_descendants {
            self.store.clear_descendants(field_key)?;
        }
        Ok(())
    }

    /// The text of `field_key` changed in the UI.
    ///
    /// Empty text clears the field at once. Text that merely echoes a value
    /// the engine wrote itself is acknowledged without searching.
    pub fn input(&mut self, field_key: &str, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            self.store.clear_field(field_key)?;
            self.suggestions.search(field_key, "", None)?;
            return Ok(());
        }

        let echoed = self.store.value(field_key) == Some(text)
            && self.store.phase(field_key) != FieldPhase::UserEditing;
        if echoed {
            self.store.acknowledge(field_key)?;
            return Ok(());
        }

        self.store.edit_freehand(field_key, text)?;
        let parent_stable_id = self.parent_stable_id(field_key)?;
        self.suggestions
            .search(field_key, text, parent_stable_id.as_deref())?;
        Ok(())
    }

    pub fn clear_descendants(&mut self, field_key: &str) -> Result<(), SessionError> {
        self.store.clear_descendants(field_key)?;
        self.suggestions.clear_descendant_suggestions(field_key)?;
        Ok(())
    }

    /// Load a saved address, discarding any in-progress suggestions.
    pub fn bulk_set(&mut self, values: AddressValues) {
        self.suggestions.reset();
        self.store.bulk_set(values);
    }

    /// Start over for the next patient.
    pub fn reset_all(&mut self) {
        self.suggestions.reset();
        self.store.reset_all();
    }

    pub fn is_read_only(&self, field_key: &str) -> Result<bool, SessionError> {
        Ok(read_only::is_read_only(
            field_key,
            self.store.levels(),
            self.store.values(),
            &self.strictness,
            self.config.display_top_down,
        )?)
    }

    pub fn read_only_map(&self) -> BTreeMap<String, bool> {
        read_only::read_only_map(
            self.store.levels(),
            self.store.values(),
            &self.strictness,
            self.config.display_top_down,
        )
    }

    /// Whether `field_key`, if strict and non-empty, is backed by an
    /// identifier from the hierarchy.
    pub fn is_resolved(&self, field_key: &str) -> Result<bool, SessionError> {
        Ok(self.store.is_resolved(field_key, &self.strictness)?)
    }

    pub fn validate_field(
        &self,
        field_key: &str,
    ) -> Result<Option<FieldValidationError>, SessionError> {
        Ok(validation::validate_field(
            &self.store,
            &self.strictness,
            field_key,
        )?)
    }

    pub fn validate_all(&self) -> Vec<FieldValidationError> {
        validation::validate_all(&self.store, &self.strictness)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            cascade: self.store.snapshot(),
            read_only: self.read_only_map(),
        }
    }

    fn parent_stable_id(&self, field_key: &str) -> Result<Option<String>, SessionError> {
        let parent = self.store.levels().parent_of(field_key)?;
        Ok(parent
            .and_then(|p| self.store.metadata(&p.field_key))
            .and_then(|m| m.stable_id.clone()))
    }
}
