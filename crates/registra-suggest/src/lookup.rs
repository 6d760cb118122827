use std::future::Future;
use std::pin::Pin;

use registra_core::models::entry::HierarchyEntry;
use registra_core::models::level::HierarchyLevel;

use crate::error::LookupError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One hierarchy search, as sent after the debounce window closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub level_key: String,
    pub query: String,
    pub limit: usize,
    /// Restrict results to children of this entry.
    pub parent_stable_id: Option<String>,
}

/// The server-side address hierarchy.
///
/// Implementations own their own request timeouts; callers only discard
/// stale results, they never retry.
pub trait HierarchyLookup: Send + Sync {
    /// The configured levels, root first.
    fn fetch_ordered_levels(&self) -> BoxFuture<'_, Result<Vec<HierarchyLevel>, LookupError>>;

    /// Entries at `request.level_key` matching `request.query`.
    fn search_entries(
        &self,
        request: SearchRequest,
    ) -> BoxFuture<'_, Result<Vec<HierarchyEntry>, LookupError>>;
}
