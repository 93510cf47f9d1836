//! Sender trait definition.

use async_trait::async_trait;
use stakepay_types::PlannedTransaction;

use crate::error::SettleResult;
use crate::types::TxReceipt;

/// Trait for submitting distribution transactions on-chain.
///
/// This trait abstracts the chain client, allowing for:
/// - A real implementation that signs, submits and waits for a receipt
/// - A mock implementation for testing
///
/// `send` resolves once the transaction has reached a terminal state. Only
/// [`TxStatus::Successful`](crate::TxStatus::Successful) counts as paid; the
/// confirmed transfer must then show up as a distribution event in the
/// history before the next tick.
#[async_trait]
pub trait RewardsSender: Send + Sync {
    /// Submit one planned transaction and wait for its outcome.
    async fn send(&self, tx: &PlannedTransaction) -> SettleResult<TxReceipt>;
}
