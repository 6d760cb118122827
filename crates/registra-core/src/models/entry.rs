use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A hierarchy search result, with its (possibly partial) ancestor chain.
///
/// A link without a `stable_id` belongs to a level that is not itself
/// constrained. A link without a name carries nothing to populate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HierarchyEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_generated_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<HierarchyEntry>>,
}

impl HierarchyEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stable_id(mut self, stable_id: impl Into<String>) -> Self {
        self.stable_id = Some(stable_id.into());
        self
    }

    pub fn with_user_generated_id(mut self, id: impl Into<String>) -> Self {
        self.user_generated_id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, parent: HierarchyEntry) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// The text a field shows once this entry is selected.
    pub fn display_value(&self) -> &str {
        self.user_generated_id.as_deref().unwrap_or(&self.name)
    }

    /// Parent links, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &HierarchyEntry> {
        std::iter::successors(self.parent.as_deref(), |e| e.parent.as_deref())
    }
}
