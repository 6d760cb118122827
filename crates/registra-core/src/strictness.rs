//! Which levels must resolve to a server-confirmed hierarchy entry.
//!
//! Strictness is configured by naming one boundary level. The boundary and
//! every ancestor above it are strict; everything below it stays free text.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::models::level::LevelChain;

/// Derived `field_key -> strict` flags. Rebuilt from configuration, never
/// edited by user actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrictnessMap(BTreeMap<String, bool>);

impl StrictnessMap {
    pub fn is_strict(&self, field_key: &str) -> bool {
        self.0.get(field_key).copied().unwrap_or(false)
    }

    pub fn strict_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, strict)| **strict)
            .map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Resolve strictness for every configured level.
///
/// An unknown boundary fails open: every level is treated as free text.
pub fn resolve_strictness(levels: &LevelChain, strict_from_level: Option<&str>) -> StrictnessMap {
    let boundary = match strict_from_level {
        None => None,
        Some(key) => {
            let found = levels.index_of(key);
            if found.is_none() {
                warn!(boundary = %key, "strictness boundary is not a configured level, treating all levels as free text");
            }
            found
        }
    };

    StrictnessMap(
        levels
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let strict = boundary.is_some_and(|b| index <= b);
                (level.field_key.clone(), strict)
            })
            .collect(),
    )
}
