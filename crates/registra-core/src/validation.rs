use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::cascade::CascadeStore;
use crate::error::CascadeError;
use crate::models::level::HierarchyLevel;
use crate::models::metadata::FieldMetadata;
use crate::strictness::StrictnessMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldIssue {
    /// A required level has no value.
    Required,
    /// A strict level holds free text that was never picked from the hierarchy.
    NotFromHierarchy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct FieldValidationError {
    pub field_key: String,
    pub issue: FieldIssue,
    pub message: String,
}

/// Validate one level's current value.
pub fn validate_level(
    level: &HierarchyLevel,
    value: Option<&str>,
    metadata: Option<&FieldMetadata>,
    strict: bool,
) -> Option<FieldValidationError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());

    match value {
        None if level.required => Some(FieldValidationError {
            field_key: level.field_key.clone(),
            issue: FieldIssue::Required,
            message: format!("{} is required", level.display_name),
        }),
        None => None,
        Some(_) if strict && !metadata.is_some_and(FieldMetadata::has_identifier) => {
            Some(FieldValidationError {
                field_key: level.field_key.clone(),
                issue: FieldIssue::NotFromHierarchy,
                message: format!("{}: select a value from the list", level.display_name),
            })
        }
        Some(_) => None,
    }
}

/// Validate the current value of one configured field.
pub fn validate_field(
    store: &CascadeStore,
    strictness: &StrictnessMap,
    field_key: &str,
) -> Result<Option<FieldValidationError>, CascadeError> {
    let level = store.levels().level(field_key)?;
    Ok(validate_level(
        level,
        store.value(field_key),
        store.metadata(field_key),
        strictness.is_strict(field_key),
    ))
}

/// Validate every configured level, in hierarchy order.
pub fn validate_all(store: &CascadeStore, strictness: &StrictnessMap) -> Vec<FieldValidationError> {
    store
        .levels()
        .iter()
        .filter_map(|level| {
            validate_level(
                level,
                store.value(&level.field_key),
                store.metadata(&level.field_key),
                strictness.is_strict(&level.field_key),
            )
        })
        .collect()
}
