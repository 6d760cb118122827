//! A fixed, in-memory hierarchy.
//!
//! Serves the same contract as the remote lookup from a JSON document:
//!
//! ```json
//! {
//!   "levels": [{"field_key": "country", "display_name": "Country"}],
//!   "entries": {"country": [{"name": "India", "stable_id": "c-1"}]}
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use registra_core::models::entry::HierarchyEntry;
use registra_core::models::level::HierarchyLevel;

use crate::error::LookupError;
use crate::lookup::{BoxFuture, HierarchyLookup, SearchRequest};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticHierarchy {
    #[serde(default)]
    levels: Vec<HierarchyLevel>,
    /// Entries per level key.
    #[serde(default)]
    entries: BTreeMap<String, Vec<HierarchyEntry>>,
}

impl StaticHierarchy {
    pub fn new(levels: Vec<HierarchyLevel>) -> Self {
        Self {
            levels,
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entries(
        mut self,
        level_key: impl Into<String>,
        entries: impl IntoIterator<Item = HierarchyEntry>,
    ) -> Self {
        self.entries
            .entry(level_key.into())
            .or_default()
            .extend(entries);
        self
    }

    pub fn from_json(contents: &str) -> Result<Self, LookupError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Case-insensitive match on entry names. Prefix matches come first,
    /// then substring matches, each in insertion order.
    pub fn search(&self, request: &SearchRequest) -> Vec<HierarchyEntry> {
        let Some(candidates) = self.entries.get(&request.level_key) else {
            return Vec::new();
        };

        let needle = request.query.trim().to_lowercase();
        let under_parent = |entry: &&HierarchyEntry| match request.parent_stable_id.as_deref() {
            None => true,
            Some(parent_id) => entry
                .parent
                .as_ref()
                .is_some_and(|p| p.stable_id.as_deref() == Some(parent_id)),
        };

        let (prefix, contains): (Vec<_>, Vec<_>) = candidates
            .iter()
            .filter(under_parent)
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .partition(|e| e.name.to_lowercase().starts_with(&needle));

        prefix
            .into_iter()
            .chain(contains)
            .take(request.limit)
            .cloned()
            .collect()
    }
}

impl HierarchyLookup for StaticHierarchy {
    fn fetch_ordered_levels(&self) -> BoxFuture<'_, Result<Vec<HierarchyLevel>, LookupError>> {
        Box::pin(async move {
            if self.levels.is_empty() {
                return Err(LookupError::Response("no levels configured".into()));
            }
            Ok(self.levels.clone())
        })
    }

    fn search_entries(
        &self,
        request: SearchRequest,
    ) -> BoxFuture<'_, Result<Vec<HierarchyEntry>, LookupError>> {
        Box::pin(async move { Ok(self.search(&request)) })
    }
}
