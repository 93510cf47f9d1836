//! Outcome types reported by senders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of one distribution transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    /// Mined and executed.
    Successful {
        /// Hash of the mined transaction
        tx_hash: String,
    },
    /// Mined but reverted.
    Reverted {
        /// Revert reason, if the node returned one
        reason: String,
    },
    /// No receipt within the sender's deadline.
    TimedOut,
    /// Evicted from the mempool or replaced.
    Dropped,
}

impl TxStatus {
    /// Whether the transaction paid its recipients.
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Successful { .. })
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successful { tx_hash } => write!(f, "successful ({tx_hash})"),
            Self::Reverted { reason } => write!(f, "reverted: {reason}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Dropped => f.write_str("dropped"),
        }
    }
}

/// What a sender reports for one planned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// `tx_index` of the planned transaction
    pub tx_index: u32,
    /// Terminal state
    pub status: TxStatus,
}

impl TxReceipt {
    /// Create a receipt.
    pub fn new(tx_index: u32, status: TxStatus) -> Self {
        Self { tx_index, status }
    }

    /// Create a receipt for a mined transaction.
    pub fn successful(tx_index: u32, tx_hash: impl Into<String>) -> Self {
        Self::new(
            tx_index,
            TxStatus::Successful {
                tx_hash: tx_hash.into(),
            },
        )
    }
}
