//! Helper functions for creating test fixtures.
//!
//! Provides deterministic addresses, a fluent [`HistoryBuilder`] and a
//! helper that writes a history to a temporary JSON file.

use std::path::PathBuf;

use stakepay_types::{Address, Amount, BlockNumber, DistributionEvent, EventHistory, Split};
use tempfile::TempDir;

/// Deterministic delegator address `0x00..0n`.
pub fn test_address(n: u8) -> Address {
    Address::parse(&format!("0x{:040x}", n)).unwrap()
}

/// The delegate address used by [`HistoryBuilder`], `0xdd..dd`.
///
/// Never equal to any [`test_address`].
pub fn test_delegate() -> Address {
    Address::parse(&format!("0x{}", "d".repeat(40))).unwrap()
}

/// Fluent builder for an [`EventHistory`].
///
/// Every call goes through the history's validated push API and panics on
/// misuse, which is what a broken fixture should do.
#[derive(Debug, Clone)]
pub struct HistoryBuilder {
    history: EventHistory,
}

impl HistoryBuilder {
    /// Empty history for [`test_delegate`] starting at `starting_block`.
    pub fn new(starting_block: BlockNumber) -> Self {
        Self {
            history: EventHistory::new(test_delegate(), starting_block),
        }
    }

    /// Use another delegate address. Call before adding events.
    pub fn delegate(self, delegate: Address) -> Self {
        assert!(
            self.history.delegation_change_events().is_empty()
                && self.history.committee_change_events().is_empty()
                && self.history.assignment_events().is_empty()
                && self.history.distribution_events().is_empty(),
            "set the delegate before adding events"
        );
        Self {
            history: EventHistory::new(delegate, self.history.starting_block()),
        }
    }

    /// Delegate's relative committee weight changes at `block`.
    pub fn committee(mut self, block: BlockNumber, weight: f64) -> Self {
        self.history.push_committee_change(block, weight).unwrap();
        self
    }

    /// Delegator stake changes at `block`.
    pub fn delegation(self, block: BlockNumber, delegator: Address, stake: u64) -> Self {
        self.delegation_amount(block, delegator, Amount::from(stake))
    }

    /// Same as [`delegation`](Self::delegation) with a big stake.
    pub fn delegation_amount(
        mut self,
        block: BlockNumber,
        delegator: Address,
        stake: Amount,
    ) -> Self {
        self.history
            .push_delegation_change(block, delegator, stake)
            .unwrap();
        self
    }

    /// Reward assignment at `block`.
    pub fn assignment(self, block: BlockNumber, amount: u64) -> Self {
        self.assignment_amount(block, Amount::from(amount))
    }

    /// Same as [`assignment`](Self::assignment) with a big amount.
    pub fn assignment_amount(mut self, block: BlockNumber, amount: Amount) -> Self {
        self.history.push_assignment(block, amount).unwrap();
        self
    }

    /// Confirmed distribution transaction at `block`, timestamp 0.
    pub fn distribution(
        self,
        block: BlockNumber,
        transfers: &[(Address, u64)],
        window: (BlockNumber, BlockNumber),
        split: Split,
        tx_index: u32,
    ) -> Self {
        self.distribution_at(block, 0, transfers, window, split, tx_index)
    }

    /// Confirmed distribution transaction at `block` with a timestamp.
    pub fn distribution_at(
        mut self,
        block: BlockNumber,
        timestamp: u64,
        transfers: &[(Address, u64)],
        window: (BlockNumber, BlockNumber),
        split: Split,
        tx_index: u32,
    ) -> Self {
        let event = DistributionEvent {
            block,
            recipient_addresses: transfers.iter().map(|(a, _)| a.clone()).collect(),
            amounts: transfers.iter().map(|(_, n)| Amount::from(*n)).collect(),
            batch_first_block: window.0,
            batch_last_block: window.1,
            batch_split: split,
            batch_tx_index: tx_index,
            timestamp,
        };
        self.history.push_distribution(event).unwrap();
        self
    }

    /// Mark every stream complete up to `block`.
    pub fn processed(mut self, block: BlockNumber) -> Self {
        self.history.mark_processed(block).unwrap();
        self
    }

    pub fn build(self) -> EventHistory {
        self.history
    }
}

/// Write `history` as JSON into a fresh temporary directory.
///
/// Keep the returned `TempDir` alive while the path is in use.
pub fn write_history_file(history: &EventHistory) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    history.save_json(&path).unwrap();
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_distinct() {
        assert_ne!(test_address(1), test_address(2));
        assert_ne!(test_address(0xdd), test_delegate());
    }

    #[test]
    fn test_builder_produces_valid_history() {
        let history = HistoryBuilder::new(3)
            .committee(3, 0.5)
            .delegation(4, test_address(1), 10)
            .assignment(6, 100)
            .processed(8)
            .build();

        assert!(history.validate().is_ok());
        assert_eq!(history.delegate_address(), &test_delegate());
        assert_eq!(history.last_processed_block(), 8);
        assert_eq!(history.assignment_events().len(), 1);
    }

    #[test]
    fn test_write_history_file_roundtrip() {
        let history = HistoryBuilder::new(1).assignment(2, 5).processed(2).build();
        let (_dir, path) = write_history_file(&history);
        assert_eq!(EventHistory::load_json(&path).unwrap(), history);
    }
}
