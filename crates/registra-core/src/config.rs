use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CascadeError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_DEBOUNCE_MS: u64 = 200;
const DEFAULT_SUGGESTION_LIMIT: usize = 20;

/// Per-session address form configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddressConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Root level rendered first. Read-only gating only applies in this mode.
    #[serde(default = "default_top_down")]
    pub display_top_down: bool,
    /// Boundary level: it and every ancestor must be picked from the hierarchy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_from_level: Option<String>,
    #[serde(default = "default_debounce_ms")]
    #[ts(type = "number")]
    pub debounce_ms: u64,
    #[serde(default = "default_suggestion_limit")]
    #[ts(type = "number")]
    pub suggestion_limit: usize,
}

fn default_top_down() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            display_top_down: default_top_down(),
            strict_from_level: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl AddressConfig {
    pub fn with_strict_from(mut self, field_key: impl Into<String>) -> Self {
        self.strict_from_level = Some(field_key.into());
        self
    }

    pub fn bottom_up(mut self) -> Self {
        self.display_top_down = false;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse, migrate and validate a JSON config document.
    pub fn from_json(contents: &str) -> Result<Self, CascadeError> {
        // Parse as raw JSON so we can run migrations before deserializing.
        let json: serde_json::Value = serde_json::from_str(contents)?;
        let on_disk_version = json
            .get("config_version")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        let migrated = migrate(json, on_disk_version)?;
        let config: AddressConfig = serde_json::from_value(migrated)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CascadeError> {
        if self.suggestion_limit == 0 {
            return Err(CascadeError::InvalidConfig(
                "suggestion_limit must be at least 1".into(),
            ));
        }
        if self
            .strict_from_level
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            return Err(CascadeError::InvalidConfig(
                "strict_from_level cannot be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, CascadeError> {
    if from_version > CURRENT_VERSION {
        return Err(CascadeError::InvalidConfig(format!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // Pre-versioned documents already have the v1 shape; stamp them.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CascadeError::InvalidConfig("config is not a JSON object".into()))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(CURRENT_VERSION.into()),
        );
        tracing::info!(from_version, "stamped unversioned address config");
    }

    Ok(json)
}
