//! Error types for the sending seam.

use thiserror::Error;

/// Result type alias for sending operations.
pub type SettleResult<T> = Result<T, SettleError>;

/// Errors a [`RewardsSender`](crate::RewardsSender) can report instead of a
/// receipt.
///
/// A receipt with a non-successful [`TxStatus`](crate::TxStatus) means the
/// transaction reached the chain; an error means the sender could not tell.
#[derive(Debug, Error)]
pub enum SettleError {
    /// The transaction was refused before submission.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Signing key or account problem.
    #[error("signer error: {0}")]
    Signer(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Timeout error (retryable).
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Internal error (lock poisoning, unexpected state).
    #[error("internal error: {0}")]
    Internal(String),
}

impl SettleError {
    /// Create a new Rejected error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a new Signer error.
    pub fn signer(msg: impl Into<String>) -> Self {
        Self::Signer(msg.into())
    }

    /// Create a new Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new Timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error is retryable.
    ///
    /// Only meaningful to sender implementations; the distributor never
    /// retries within a tick.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}
