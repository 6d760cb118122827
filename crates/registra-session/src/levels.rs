use tracing::{info, warn};

use registra_core::models::level::LevelChain;
use registra_suggest::lookup::HierarchyLookup;

/// Fetch the configured address levels, substituting `fallback` when the
/// fetch fails or returns an unusable level list. Never fails.
pub async fn load_levels(lookup: &dyn HierarchyLookup, fallback: LevelChain) -> LevelChain {
    let fetched = match lookup.fetch_ordered_levels().await {
        Ok(levels) => levels,
        Err(e) => {
            warn!(error = %e, "failed to fetch address hierarchy levels, using defaults");
            return fallback;
        }
    };

    match LevelChain::new(fetched) {
        Ok(levels) => {
            info!(levels = levels.len(), "loaded address hierarchy levels");
            levels
        }
        Err(e) => {
            warn!(error = %e, "address hierarchy levels are unusable, using defaults");
            fallback
        }
    }
}
