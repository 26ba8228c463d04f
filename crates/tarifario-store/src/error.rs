//! Store error types

use thiserror::Error;

/// Failures of the persistence collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Executive record could not be encoded or decoded
    #[error("executive record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key is empty or would escape the store root
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),
}
