//! Per-field suggestion sessions.
//!
//! Each keystroke on a strict field replaces that field's session: the old
//! task is aborted and a new one sleeps through the debounce window before
//! querying the lookup. A result is published only if its session token is
//! still the newest for the field, so the last keystroke wins regardless of
//! the order responses arrive in. Fields never affect each other's sessions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use registra_core::config::AddressConfig;
use registra_core::models::entry::HierarchyEntry;
use registra_core::models::level::LevelChain;
use registra_core::strictness::StrictnessMap;

use crate::error::SuggestError;
use crate::lookup::{HierarchyLookup, SearchRequest};
use crate::session::{SessionToken, SuggestionSession};

#[derive(Clone)]
pub struct SuggestionCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    lookup: Arc<dyn HierarchyLookup>,
    levels: LevelChain,
    strictness: StrictnessMap,
    debounce: Duration,
    limit: usize,
    runtime: Handle,
    state: Mutex<CoordinatorState>,
}

struct CoordinatorState {
    next_token: SessionToken,
    sessions: HashMap<String, SuggestionSession>,
    suggestions: HashMap<String, Arc<[HierarchyEntry]>>,
    cleared: HashSet<String>,
}

impl CoordinatorState {
    fn issue_token(&mut self) -> SessionToken {
        let token = self.next_token;
        self.next_token = token.next();
        token
    }

    fn live_session(&mut self, field_key: &str, token: SessionToken) -> Option<&mut SuggestionSession> {
        if self.cleared.contains(field_key) {
            return None;
        }
        self.sessions
            .get_mut(field_key)
            .filter(|s| s.token() == token)
    }

    fn discard(&mut self, field_key: &str) {
        self.sessions.remove(field_key);
        self.suggestions.remove(field_key);
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SuggestionCoordinator {
    /// Create a coordinator bound to the current Tokio runtime.
    pub fn new(
        lookup: Arc<dyn HierarchyLookup>,
        levels: LevelChain,
        strictness: StrictnessMap,
        config: &AddressConfig,
    ) -> Result<Self, SuggestError> {
        let runtime = Handle::try_current().map_err(|_| SuggestError::NoRuntime)?;

        Ok(Self {
            inner: Arc::new(Inner {
                lookup,
                levels,
                strictness,
                debounce: config.debounce(),
                limit: config.suggestion_limit,
                runtime,
                state: Mutex::new(CoordinatorState {
                    next_token: SessionToken::first(),
                    sessions: HashMap::new(),
                    suggestions: HashMap::new(),
                    cleared: HashSet::new(),
                }),
            }),
        })
    }

    /// Start (or restart) the debounced search for `field_key`.
    ///
    /// An empty query cancels the field's session, drops its suggestions and
    /// marks it cleared without waiting for the debounce window. Fields that
    /// are not strict never search.
    pub fn search(
        &self,
        field_key: &str,
        query: &str,
        parent_stable_id: Option<&str>,
    ) -> Result<(), SuggestError> {
        self.inner.levels.position(field_key)?;

        let mut state = self.inner.lock();

        if query.trim().is_empty() {
            state.discard(field_key);
            state.cleared.insert(field_key.to_string());
            debug!(field_key = %field_key, "query emptied, suggestions cleared");
            return Ok(());
        }

        if !self.inner.strictness.is_strict(field_key) {
            debug!(field_key = %field_key, "free-text field, skipping hierarchy search");
            return Ok(());
        }

        state.cleared.remove(field_key);
        let token = state.issue_token();
        let request = SearchRequest {
            level_key: field_key.to_string(),
            query: query.to_string(),
            limit: self.inner.limit,
            parent_stable_id: parent_stable_id.map(str::to_string),
        };

        let task = self.inner.runtime.spawn(run_session(
            Arc::clone(&self.inner),
            field_key.to_string(),
            token,
            request,
        ));

        let mut session = SuggestionSession::new(token, query.to_string());
        session.attach(task.abort_handle());
        // Replacing the previous session aborts its task.
        state.sessions.insert(field_key.to_string(), session);

        Ok(())
    }

    /// Current suggestions for `field_key`. Empty for unknown fields.
    pub fn suggestions(&self, field_key: &str) -> Arc<[HierarchyEntry]> {
        self.inner
            .lock()
            .suggestions
            .get(field_key)
            .cloned()
            .unwrap_or_else(|| Arc::from([]))
    }

    /// The last query that actually reached the lookup for `field_key`.
    pub fn committed_query(&self, field_key: &str) -> Option<String> {
        self.inner
            .lock()
            .sessions
            .get(field_key)
            .and_then(|s| s.committed_query().map(str::to_string))
    }

    pub fn is_pending(&self, field_key: &str) -> bool {
        self.inner
            .lock()
            .sessions
            .get(field_key)
            .is_some_and(SuggestionSession::is_pending)
    }

    pub fn is_cleared(&self, field_key: &str) -> bool {
        self.inner.lock().cleared.contains(field_key)
    }

    /// Drop suggestion lists and sessions of every level below `field_key`.
    /// Their values are left alone.
    pub fn clear_descendant_suggestions(&self, field_key: &str) -> Result<(), SuggestError> {
        let descendants = self.inner.levels.descendants(field_key)?;
        let mut state = self.inner.lock();
        for level in descendants {
            state.discard(&level.field_key);
        }
        Ok(())
    }

    /// Drop `field_key`'s session and suggestion list, e.g. after its value
    /// was written by a descendant's selection. Does not mark it cleared.
    pub fn clear_suggestions(&self, field_key: &str) -> Result<(), SuggestError> {
        self.inner.levels.position(field_key)?;
        self.inner.lock().discard(field_key);
        Ok(())
    }

    pub fn unmark_cleared(&self, field_key: &str) {
        self.inner.lock().cleared.remove(field_key);
    }

    /// Invalidate the field's session without touching its suggestions.
    pub fn cancel(&self, field_key: &str) {
        self.inner.lock().sessions.remove(field_key);
    }

    /// Invalidate every session and drop all suggestions.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.sessions.clear();
        state.suggestions.clear();
        state.cleared.clear();
        info!("suggestion sessions reset");
    }
}

async fn run_session(
    inner: Arc<Inner>,
    field_key: String,
    token: SessionToken,
    request: SearchRequest,
) {
    tokio::time::sleep(inner.debounce).await;

    {
        let mut state = inner.lock();
        match state.live_session(&field_key, token) {
            Some(session) => session.commit(),
            None => return,
        }
    }

    let result = inner.lookup.search_entries(request).await;

    let mut state = inner.lock();
    if state.live_session(&field_key, token).is_none() {
        debug!(field_key = %field_key, token = token.get(), "discarding stale suggestion result");
        return;
    }

    let entries: Arc<[HierarchyEntry]> = match result {
        Ok(entries) => entries.into(),
        Err(e) => {
            warn!(field_key = %field_key, error = %e, "hierarchy search failed");
            Arc::from([])
        }
    };
    state.suggestions.insert(field_key, entries);
}
