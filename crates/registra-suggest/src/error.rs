use registra_core::error::CascadeError;
use thiserror::Error;

/// Failures reported by a hierarchy lookup collaborator.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("hierarchy request failed: {0}")]
    Request(String),

    #[error("hierarchy request timed out")]
    Timeout,

    #[error("unexpected hierarchy response: {0}")]
    Response(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error("suggestion coordinator must be created inside a Tokio runtime")]
    NoRuntime,
}
