use std::collections::BTreeMap;

use crate::error::CascadeError;
use crate::models::address::AddressValues;
use crate::models::level::LevelChain;
use crate::strictness::StrictnessMap;

/// Whether `field_key` must be disabled.
///
/// Only applies in top-down display mode: a strict level is read-only while
/// its immediate parent is empty. The root is never read-only, and nothing is
/// read-only when leaves are rendered first.
pub fn is_read_only(
    field_key: &str,
    levels: &LevelChain,
    values: &AddressValues,
    strictness: &StrictnessMap,
    top_down: bool,
) -> Result<bool, CascadeError> {
    let parent = levels.parent_of(field_key)?;
    if !top_down || !strictness.is_strict(field_key) {
        return Ok(false);
    }
    Ok(parent.is_some_and(|p| values.is_blank(&p.field_key)))
}

/// Read-only flags for every configured level.
pub fn read_only_map(
    levels: &LevelChain,
    values: &AddressValues,
    strictness: &StrictnessMap,
    top_down: bool,
) -> BTreeMap<String, bool> {
    let mut flags = BTreeMap::new();
    let mut parent: Option<&str> = None;
    for level in levels {
        let read_only = top_down
            && strictness.is_strict(&level.field_key)
            && parent.is_some_and(|p| values.is_blank(p));
        flags.insert(level.field_key.clone(), read_only);
        parent = Some(&level.field_key);
    }
    flags
}
