//! Chain error types.

use thiserror::Error;

/// Errors that can occur at the chain boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The string is not a well-formed Ethereum address.
    #[error("not a valid ethereum address: {0}")]
    InvalidAddress(String),

    /// The underlying chain client failed.
    #[error("chain client error: {0}")]
    Client(String),
}

impl From<ChainError> for common::NodeError {
    fn from(e: ChainError) -> Self {
        common::NodeError::Chain(e.to_string())
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
