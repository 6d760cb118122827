use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::metadata::FieldMetadata;

/// Metadata per field key.
pub type MetadataMap = BTreeMap<String, FieldMetadata>;

/// Current text per field key.
///
/// An absent key was never touched; `None` was explicitly cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddressValues(BTreeMap<String, Option<String>>);

impl AddressValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value as text. Both untouched and cleared fields read as `None`.
    pub fn get(&self, field_key: &str) -> Option<&str> {
        self.0.get(field_key).and_then(|v| v.as_deref())
    }

    /// The raw slot: `None` when untouched, `Some(None)` when cleared.
    pub fn slot(&self, field_key: &str) -> Option<&Option<String>> {
        self.0.get(field_key)
    }

    pub fn is_touched(&self, field_key: &str) -> bool {
        self.0.contains_key(field_key)
    }

    /// Untouched, cleared and whitespace-only all count as empty.
    pub fn is_blank(&self, field_key: &str) -> bool {
        self.get(field_key).is_none_or(|v| v.trim().is_empty())
    }

    pub fn set(&mut self, field_key: impl Into<String>, value: Option<String>) {
        self.0.insert(field_key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for AddressValues {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for AddressValues {
    type Item = (String, Option<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
