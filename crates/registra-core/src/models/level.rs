use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CascadeError;

/// One rung of the address ladder (e.g. country, state, district).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HierarchyLevel {
    pub field_key: String,
    pub display_name: String,
    #[serde(default)]
    pub required: bool,
}

impl HierarchyLevel {
    pub fn new(field_key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            display_name: display_name.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The configured levels in hierarchy order, root first.
///
/// Index in the chain is depth. Field keys are unique, so every key maps to
/// exactly one position. Cloning shares the underlying slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChain {
    levels: Arc<[HierarchyLevel]>,
}

impl LevelChain {
    pub fn new(levels: Vec<HierarchyLevel>) -> Result<Self, CascadeError> {
        if levels.is_empty() {
            return Err(CascadeError::EmptyLevels);
        }

        let mut seen = HashSet::new();
        for level in &levels {
            if level.field_key.trim().is_empty() {
                return Err(CascadeError::InvalidConfig(
                    "level field_key cannot be blank".into(),
                ));
            }
            if !seen.insert(level.field_key.as_str()) {
                return Err(CascadeError::DuplicateField(level.field_key.clone()));
            }
        }

        Ok(Self {
            levels: levels.into(),
        })
    }

    /// Only for compile-time level sets that are known to be valid.
    pub(crate) fn from_static(levels: Vec<HierarchyLevel>) -> Self {
        Self {
            levels: levels.into(),
        }
    }

    pub fn levels(&self) -> &[HierarchyLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HierarchyLevel> {
        self.levels.iter()
    }

    pub fn contains(&self, field_key: &str) -> bool {
        self.index_of(field_key).is_some()
    }

    pub fn index_of(&self, field_key: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.field_key == field_key)
    }

    /// Position of `field_key`, or `UnknownField` if it is not configured.
    pub fn position(&self, field_key: &str) -> Result<usize, CascadeError> {
        self.index_of(field_key)
            .ok_or_else(|| CascadeError::UnknownField(field_key.to_string()))
    }

    pub fn level(&self, field_key: &str) -> Result<&HierarchyLevel, CascadeError> {
        let position = self.position(field_key)?;
        Ok(&self.levels[position])
    }

    /// The immediate parent level. `None` for the root.
    pub fn parent_of(&self, field_key: &str) -> Result<Option<&HierarchyLevel>, CascadeError> {
        let position = self.position(field_key)?;
        Ok(position.checked_sub(1).map(|p| &self.levels[p]))
    }

    /// Ancestor levels, nearest first.
    pub fn ancestors(
        &self,
        field_key: &str,
    ) -> Result<impl Iterator<Item = &HierarchyLevel>, CascadeError> {
        let position = self.position(field_key)?;
        Ok(self.levels[..position].iter().rev())
    }

    /// Levels strictly more specific than `field_key`, in hierarchy order.
    pub fn descendants(&self, field_key: &str) -> Result<&[HierarchyLevel], CascadeError> {
        let position = self.position(field_key)?;
        Ok(&self.levels[position + 1..])
    }
}

impl<'a> IntoIterator for &'a LevelChain {
    type Item = &'a HierarchyLevel;
    type IntoIter = std::slice::Iter<'a, HierarchyLevel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
