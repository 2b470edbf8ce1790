use super::{QueryError, StorageError};

/// Top-level error type for the Engram memory system.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("query error: {0}")]
    QueryError(#[from] QueryError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

/// Convenience type alias.
pub type EngramResult<T> = Result<T, EngramError>;
