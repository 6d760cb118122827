//! Built-in level set and JSON level configuration.

use crate::error::CascadeError;
use crate::models::level::{HierarchyLevel, LevelChain};

/// Field keys of the built-in level set.
pub mod field {
    pub const COUNTRY: &str = "country";
    pub const STATE_PROVINCE: &str = "stateProvince";
    pub const COUNTY_DISTRICT: &str = "countyDistrict";
    pub const CITY_VILLAGE: &str = "cityVillage";
    pub const POSTAL_CODE: &str = "postalCode";
}

/// Level set used when the configured hierarchy cannot be fetched.
pub fn default_levels() -> LevelChain {
    LevelChain::from_static(vec![
        HierarchyLevel::new(field::COUNTRY, "Country"),
        HierarchyLevel::new(field::STATE_PROVINCE, "State"),
        HierarchyLevel::new(field::COUNTY_DISTRICT, "District"),
        HierarchyLevel::new(field::CITY_VILLAGE, "City/Village"),
        HierarchyLevel::new(field::POSTAL_CODE, "Postal Code"),
    ])
}

/// Parse an ordered level list (root first) from JSON.
pub fn levels_from_json(contents: &str) -> Result<LevelChain, CascadeError> {
    let levels: Vec<HierarchyLevel> = serde_json::from_str(contents)?;
    LevelChain::new(levels)
}
