//! On-chain events consumed by the reward engine.
//!
//! A delegate's history is made of four event streams. Each event records
//! the block it was emitted in; streams are kept in block order by
//! [`EventHistory`](crate::EventHistory).

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::{serde_amount, serde_amounts, Amount};
use crate::error::{TypesError, TypesResult};

/// Ethereum block number.
pub type BlockNumber = u64;

/// Anything emitted in a block.
pub trait BlockEvent {
    fn block(&self) -> BlockNumber;
}

macro_rules! impl_block_event {
    ($($ty:ty),*) => {
        $(impl BlockEvent for $ty {
            fn block(&self) -> BlockNumber {
                self.block
            }
        })*
    };
}

impl_block_event!(
    DelegationChangeEvent,
    CommitteeChangeEvent,
    AssignmentEvent,
    DistributionEvent
);

/// How each reward assignment is shared between the delegator pool and the
/// delegate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Split {
    /// Fraction of every assignment paid to the delegator pool, in `[0, 1]`.
    /// The rest, plus rounding residue, goes to the delegate.
    pub fraction_for_delegators: f64,
}

impl Split {
    /// Create a split, checking that the fraction lies in `[0, 1]`.
    pub fn new(fraction_for_delegators: f64) -> TypesResult<Self> {
        let split = Self {
            fraction_for_delegators,
        };
        if !split.is_valid() {
            return Err(TypesError::InvalidSplit {
                fraction: fraction_for_delegators,
            });
        }
        Ok(split)
    }

    /// Whether the fraction is a finite number in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.fraction_for_delegators)
    }
}

/// A delegator changed the stake delegated to this delegate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DelegationChangeEvent {
    pub block: BlockNumber,
    pub delegator_address: Address,
    /// New total stake of the delegator; zero means it stopped delegating.
    #[serde(with = "serde_amount")]
    pub new_delegated_stake: Amount,
}

/// The delegate's relative weight in the active committee changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommitteeChangeEvent {
    pub block: BlockNumber,
    /// Fraction of the committee's total weight held by the delegate.
    pub new_relative_weight_in_committee: f64,
}

/// The protocol assigned rewards to the delegate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentEvent {
    pub block: BlockNumber,
    #[serde(with = "serde_amount")]
    pub amount: Amount,
}

/// One confirmed distribution transaction.
///
/// A distribution of the window `batch_first_block..=batch_last_block` may
/// take several transactions; they share window and split and differ in
/// `batch_tx_index`. `recipient_addresses[0]` is the delegate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DistributionEvent {
    pub block: BlockNumber,
    pub recipient_addresses: Vec<Address>,
    #[serde(with = "serde_amounts")]
    pub amounts: Vec<Amount>,
    pub batch_first_block: BlockNumber,
    pub batch_last_block: BlockNumber,
    pub batch_split: Split,
    pub batch_tx_index: u32,
    /// Timestamp (seconds) of the block the event was confirmed in.
    #[serde(default)]
    pub timestamp: u64,
}

impl DistributionEvent {
    /// The window this transaction belongs to.
    pub fn window(&self) -> (BlockNumber, BlockNumber) {
        (self.batch_first_block, self.batch_last_block)
    }

    /// Whether this transaction belongs to the given window.
    pub fn is_for_window(&self, first_block: BlockNumber, last_block: BlockNumber) -> bool {
        self.batch_first_block == first_block && self.batch_last_block == last_block
    }

    /// Sum of all amounts paid by this transaction.
    pub fn total_amount(&self) -> Amount {
        self.amounts.iter().sum()
    }

    /// Iterate over `(recipient, amount)` pairs.
    pub fn transfers(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.recipient_addresses.iter().zip(self.amounts.iter())
    }
}
