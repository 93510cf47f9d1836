//! Mock implementation of the `RewardsSender` trait for testing.
//!
//! Records every planned transaction it receives and answers with
//! configurable outcomes. Successful transactions can then be confirmed into
//! an [`EventHistory`], the way the ingester would pick them up from chain.

use async_trait::async_trait;
use stakepay_settle::{RewardsSender, SettleError, SettleResult, TxReceipt, TxStatus};
use stakepay_types::{BlockNumber, EventHistory, PlannedTransaction};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Scripted answer for one `send` call.
#[derive(Debug, Clone)]
enum Scripted {
    Status(TxStatus),
    NetworkError,
}

struct MockSenderInner {
    /// Every transaction passed to `send`, in call order.
    sent: Vec<PlannedTransaction>,
    /// Successful transactions not yet confirmed into a history.
    unconfirmed: Vec<PlannedTransaction>,
    /// Call number (0-based) -> scripted outcome. Unscripted calls succeed.
    script: HashMap<usize, Scripted>,
    /// Auto-incrementing hash counter.
    tx_counter: u64,
}

/// A mock implementation of the `RewardsSender` trait for testing.
///
/// Uses `Arc<RwLock<...>>` internally, so it is cheap to clone and all
/// clones share the same state.
#[derive(Clone)]
pub struct MockSender {
    inner: Arc<RwLock<MockSenderInner>>,
}

impl Default for MockSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSender {
    /// Create a sender whose transactions all succeed.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockSenderInner {
                sent: Vec::new(),
                unconfirmed: Vec::new(),
                script: HashMap::new(),
                tx_counter: 0,
            })),
        }
    }

    /// Answer the `call`-th send (0-based, counted across ticks) with
    /// `status`.
    pub fn with_status_at(self, call: usize, status: TxStatus) -> Self {
        self.inner
            .write()
            .unwrap()
            .script
            .insert(call, Scripted::Status(status));
        self
    }

    /// Fail the `call`-th send with a network error.
    pub fn with_network_error_at(self, call: usize) -> Self {
        self.inner
            .write()
            .unwrap()
            .script
            .insert(call, Scripted::NetworkError);
        self
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// All transactions passed to `send`, in call order.
    pub fn sent(&self) -> Vec<PlannedTransaction> {
        self.inner.read().unwrap().sent.clone()
    }

    /// Number of `send` calls so far.
    pub fn send_count(&self) -> usize {
        self.inner.read().unwrap().sent.len()
    }

    /// Push every successful, unconfirmed transaction into `history` as a
    /// distribution event at `block`, then mark `block` processed.
    ///
    /// Returns how many events were added.
    pub fn confirm_into(
        &self,
        history: &mut EventHistory,
        block: BlockNumber,
        timestamp: u64,
    ) -> usize {
        let confirmed: Vec<PlannedTransaction> =
            self.inner.write().unwrap().unconfirmed.drain(..).collect();
        let count = confirmed.len();
        for tx in confirmed {
            history.push_distribution(tx.into_event(block, timestamp)).unwrap();
        }
        history.mark_processed(block).unwrap();
        count
    }

    fn next_tx_hash(inner: &mut MockSenderInner) -> String {
        inner.tx_counter += 1;
        format!("0x{:064x}", inner.tx_counter)
    }
}

#[async_trait]
impl RewardsSender for MockSender {
    async fn send(&self, tx: &PlannedTransaction) -> SettleResult<TxReceipt> {
        let mut inner = self.inner.write().unwrap();
        let call = inner.sent.len();
        inner.sent.push(tx.clone());
        debug!(call, tx_index = tx.tx_index, "mock send");

        let status = match inner.script.get(&call).cloned() {
            Some(Scripted::NetworkError) => {
                return Err(SettleError::network("mock: configured to fail"));
            }
            Some(Scripted::Status(status)) => status,
            None => TxStatus::Successful {
                tx_hash: Self::next_tx_hash(&mut inner),
            },
        };

        if status.is_successful() {
            inner.unconfirmed.push(tx.clone());
        }
        Ok(TxReceipt::new(tx.tx_index, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_address, test_delegate, HistoryBuilder};
    use stakepay_types::{Amount, Split};

    fn planned(tx_index: u32) -> PlannedTransaction {
        PlannedTransaction::new(
            vec![test_delegate(), test_address(1)],
            vec![Amount::from(5u32), Amount::from(7u32)],
            tx_index,
            1,
            10,
            Split {
                fraction_for_delegators: 0.5,
            },
        )
    }

    #[tokio::test]
    async fn test_default_succeeds_and_confirms() {
        let sender = MockSender::new();
        let receipt = sender.send(&planned(0)).await.unwrap();
        assert!(receipt.status.is_successful());
        assert_eq!(receipt.tx_index, 0);

        let mut history = HistoryBuilder::new(1).processed(10).build();
        assert_eq!(sender.confirm_into(&mut history, 11, 99), 1);
        assert_eq!(history.distribution_events().len(), 1);
        assert_eq!(history.distribution_events()[0].timestamp, 99);
        assert_eq!(history.last_processed_block(), 11);

        // Already confirmed
        assert_eq!(sender.confirm_into(&mut history, 12, 100), 0);
    }

    #[tokio::test]
    async fn test_scripted_outcomes() {
        let sender = MockSender::new()
            .with_status_at(1, TxStatus::Dropped)
            .with_network_error_at(2);

        assert!(sender.send(&planned(0)).await.unwrap().status.is_successful());
        assert_eq!(
            sender.send(&planned(1)).await.unwrap().status,
            TxStatus::Dropped
        );
        assert!(sender.send(&planned(2)).await.unwrap_err().is_retryable());
        assert_eq!(sender.send_count(), 3);

        let mut history = HistoryBuilder::new(1).processed(10).build();
        assert_eq!(sender.confirm_into(&mut history, 11, 0), 1);
    }
}
