//! Error types for the operations layer.
//!
//! This module defines the `OpsError` enum used by the distributor, the
//! configuration and the status report.

use stakepay_econ::EconError;
use stakepay_types::{Address, BlockNumber, TypesError};
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

/// Errors that can occur while running distributions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // History Errors
    // =========================================================================
    /// The history belongs to another delegate than the configured one.
    #[error("history is for delegate {history}, configured delegate is {configured}")]
    DelegateMismatch {
        /// Delegate from the configuration.
        configured: Address,
        /// Delegate recorded in the history.
        history: Address,
    },

    /// The history claims blocks before the configured first block.
    #[error("history starts at block {starting_block}, before configured first block {first_block}")]
    HistoryBeforeFirstBlock {
        /// Starting block of the history.
        starting_block: BlockNumber,
        /// Configured first block.
        first_block: BlockNumber,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Reward calculation error.
    #[error("econ error: {0}")]
    Econ(#[from] EconError),

    /// Data model error.
    #[error("types error: {0}")]
    Types(#[from] TypesError),
}

impl OpsError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        OpsError::Config(msg.into())
    }
}
