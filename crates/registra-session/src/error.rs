use registra_core::error::CascadeError;
use registra_suggest::error::SuggestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("address cascade error: {0}")]
    Cascade(#[from] CascadeError),

    #[error("suggestion error: {0}")]
    Suggest(#[from] SuggestError),
}
