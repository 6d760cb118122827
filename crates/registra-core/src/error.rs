use thiserror::Error;

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("duplicate field in level configuration: {0}")]
    DuplicateField(String),

    #[error("level configuration is empty")]
    EmptyLevels,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
