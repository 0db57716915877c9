//! Store error types.

use claim_core::{ClaimError, ConflictError};
use thiserror::Error;

/// Storage layer error
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness invariant rejected the write; carries the existing record
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Backend failure; the transaction was rolled back
    #[error("Storage error: {0}")]
    Storage(String),

    /// Value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for ClaimError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(conflict) => ClaimError::Conflict(conflict),
            other => ClaimError::Internal(other.to_string()),
        }
    }
}
