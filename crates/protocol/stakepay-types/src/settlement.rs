//! Planned distribution transactions.
//!
//! A [`PlannedTransaction`] is what the reward engine hands to the external
//! sender. Once confirmed on-chain it comes back as a
//! [`DistributionEvent`](crate::DistributionEvent) carrying the same window,
//! split and transaction index.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::{serde_amount, serde_amounts, Amount};
use crate::events::{BlockNumber, DistributionEvent, Split};

/// One prospective distribution transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannedTransaction {
    /// Recipients; the delegate is always first.
    pub recipient_addresses: Vec<Address>,
    #[serde(with = "serde_amounts")]
    pub amounts: Vec<Amount>,
    #[serde(with = "serde_amount")]
    pub total_amount: Amount,
    pub tx_index: u32,
    pub first_block: BlockNumber,
    pub last_block: BlockNumber,
    pub split: Split,
}

impl PlannedTransaction {
    /// Build a planned transaction, computing its total.
    pub fn new(
        recipient_addresses: Vec<Address>,
        amounts: Vec<Amount>,
        tx_index: u32,
        first_block: BlockNumber,
        last_block: BlockNumber,
        split: Split,
    ) -> Self {
        let total_amount = amounts.iter().sum();
        Self {
            recipient_addresses,
            amounts,
            total_amount,
            tx_index,
            first_block,
            last_block,
            split,
        }
    }

    /// Number of recipients in this transaction.
    pub fn recipient_count(&self) -> usize {
        self.recipient_addresses.len()
    }

    /// The event this transaction produces once confirmed at `block`.
    pub fn into_event(self, block: BlockNumber, timestamp: u64) -> DistributionEvent {
        DistributionEvent {
            block,
            recipient_addresses: self.recipient_addresses,
            amounts: self.amounts,
            batch_first_block: self.first_block,
            batch_last_block: self.last_block,
            batch_split: self.split,
            batch_tx_index: self.tx_index,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_total_is_sum_of_amounts() {
        let tx = PlannedTransaction::new(
            vec![addr(0xaa), addr(1)],
            vec![Amount::from(3000u32), Amount::from(1000u32)],
            2,
            1,
            15,
            Split {
                fraction_for_delegators: 0.6,
            },
        );
        assert_eq!(tx.total_amount, Amount::from(4000u32));
        assert_eq!(tx.recipient_count(), 2);
    }

    #[test]
    fn test_into_event_keeps_window_and_index() {
        let tx = PlannedTransaction::new(
            vec![addr(0xaa)],
            vec![Amount::from(7u32)],
            4,
            10,
            15,
            Split {
                fraction_for_delegators: 0.5,
            },
        );
        let event = tx.into_event(20, 1_700_000_000);
        assert_eq!(event.window(), (10, 15));
        assert_eq!(event.batch_tx_index, 4);
        assert_eq!(event.block, 20);
        assert_eq!(event.timestamp, 1_700_000_000);
    }
}
