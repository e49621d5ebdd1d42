//! Error types for the conflict engine

use thiserror::Error;

/// Errors that can occur while acting on detected conflicts
#[derive(Debug, Error)]
pub enum ConflictError {
    /// No conflict with the given key in the current list
    #[error("conflict not found: {0}")]
    NotFound(String),

    /// The conflict was already resolved; the first resolution wins
    #[error("conflict already resolved: {0}")]
    AlreadyResolved(String),

    /// The dispatch backend rejected or failed the submission
    #[error("dispatch gateway error: {0}")]
    Gateway(#[from] anyhow::Error),
}
