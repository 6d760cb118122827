use tokio::task::AbortHandle;

/// Issued per keystroke. Only the newest token for a field may publish
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// The live search for one field: its token, the query being debounced,
/// the query that actually went out, and the task doing the work.
///
/// Dropping a session cancels its task.
#[derive(Debug)]
pub struct SuggestionSession {
    token: SessionToken,
    query: String,
    committed_query: Option<String>,
    task: Option<AbortHandle>,
}

impl SuggestionSession {
    pub(crate) fn new(token: SessionToken, query: String) -> Self {
        Self {
            token,
            query,
            committed_query: None,
            task: None,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn committed_query(&self) -> Option<&str> {
        self.committed_query.as_deref()
    }

    /// Still debouncing or waiting on the lookup.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub(crate) fn attach(&mut self, task: AbortHandle) {
        self.task = Some(task);
    }

    /// The debounce window closed and the query left for the lookup.
    pub(crate) fn commit(&mut self) {
        self.committed_query = Some(self.query.clone());
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SuggestionSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
