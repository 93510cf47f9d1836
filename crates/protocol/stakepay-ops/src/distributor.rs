//! The distribution run-loop tick.
//!
//! A tick is stateless: it rebuilds the current distribution from the event
//! history, plans what is still unpaid and hands the transactions to the
//! sender one by one. Whatever the sender manages to confirm shows up in the
//! history; the next tick starts again from there.

use serde::Serialize;
use stakepay_econ::{Distribution, EconError};
use stakepay_settle::{RewardsSender, TxStatus};
use stakepay_types::{BlockNumber, EventHistory};
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::OpsResult;
use crate::schedule::should_start_distribution;

/// Why sending stopped before the end of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stopped {
    /// The sender returned a terminal state other than success.
    Status {
        /// Index of the transaction that did not succeed.
        tx_index: u32,
        /// Its terminal state.
        status: TxStatus,
    },
    /// The sender could not report an outcome.
    Error {
        /// Index of the transaction being sent.
        tx_index: u32,
        /// Sender error message.
        message: String,
    },
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// No distribution was due, or there is no new block to cover.
    Idle,
    /// Every planned transaction succeeded.
    Complete {
        /// `(first_block, last_block)` of the distribution.
        window: (BlockNumber, BlockNumber),
        /// Transactions sent.
        sent: usize,
    },
    /// Sending stopped early; the rest is left for the next tick.
    Sent {
        /// `(first_block, last_block)` of the distribution.
        window: (BlockNumber, BlockNumber),
        /// Transactions that succeeded before the stop.
        sent: usize,
        /// Why sending stopped.
        stopped: Stopped,
    },
}

/// The distribution to work on at `current_block`, if any.
///
/// An incomplete distribution is always resumed. Otherwise a new one is
/// opened, provided the configured frequency has elapsed since the last one
/// at time `now`. With `now` unset the schedule is not checked.
pub fn pending_distribution(
    config: &Configuration,
    history: &EventHistory,
    current_block: BlockNumber,
    now: Option<u64>,
) -> OpsResult<Option<Distribution>> {
    config.check_history(history)?;
    let granularity = &config.granularity;

    let last_time = match Distribution::last(current_block, history, granularity)? {
        Some(last) if !last.is_complete() => {
            info!(
                first_block = last.first_block(),
                last_block = last.last_block(),
                confirmed = last.previous_transfers().len(),
                "Resuming incomplete distribution"
            );
            return Ok(Some(last));
        }
        Some(last) => last.last_distribution_time(),
        None => None,
    };

    if let Some(now) = now {
        if !should_start_distribution(last_time, now, config.distribution_frequency_seconds) {
            debug!(?last_time, now, "Distribution not due yet");
            return Ok(None);
        }
    }

    match Distribution::start_new(current_block, config.split(), history, granularity) {
        Ok(distribution) => Ok(Some(distribution)),
        Err(EconError::NothingToDistribute { first_block, .. }) => {
            debug!(first_block, current_block, "No new block to distribute");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Drives distributions for one delegate through a [`RewardsSender`].
pub struct RewardsDistributor<S: RewardsSender> {
    config: Configuration,
    sender: S,
}

impl<S: RewardsSender> RewardsDistributor<S> {
    /// Create a distributor, validating the configuration.
    pub fn new(config: Configuration, sender: S) -> OpsResult<Self> {
        config.validate()?;
        Ok(Self { config, sender })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// The distribution a tick at `current_block` and time `now` would work
    /// on, if any. See [`pending_distribution`].
    pub fn due_distribution(
        &self,
        history: &EventHistory,
        current_block: BlockNumber,
        now: u64,
    ) -> OpsResult<Option<Distribution>> {
        pending_distribution(&self.config, history, current_block, Some(now))
    }

    /// Run one tick.
    ///
    /// Sender failures do not fail the tick; they end it early and are
    /// reported in [`TickOutcome::Sent`]. Errors are reserved for invalid
    /// history or configuration.
    pub async fn tick(
        &self,
        history: &EventHistory,
        current_block: BlockNumber,
        now: u64,
    ) -> OpsResult<TickOutcome> {
        let Some(distribution) = self.due_distribution(history, current_block, now)? else {
            return Ok(TickOutcome::Idle);
        };
        let window = distribution.window();
        let batch =
            distribution.prepare_transaction_batch(self.config.max_recipients_per_rewards_tx)?;

        let mut sent = 0;
        for tx in &batch {
            match self.sender.send(tx).await {
                Ok(receipt) if receipt.status.is_successful() => {
                    info!(
                        tx_index = tx.tx_index,
                        recipients = tx.recipient_count(),
                        total = %tx.total_amount,
                        status = %receipt.status,
                        "Distribution transaction confirmed"
                    );
                    sent += 1;
                }
                Ok(receipt) => {
                    warn!(
                        tx_index = tx.tx_index,
                        status = %receipt.status,
                        "Distribution transaction did not succeed, stopping"
                    );
                    return Ok(TickOutcome::Sent {
                        window,
                        sent,
                        stopped: Stopped::Status {
                            tx_index: tx.tx_index,
                            status: receipt.status,
                        },
                    });
                }
                Err(e) => {
                    warn!(
                        tx_index = tx.tx_index,
                        error = %e,
                        retryable = e.is_retryable(),
                        "Distribution transaction failed, stopping"
                    );
                    return Ok(TickOutcome::Sent {
                        window,
                        sent,
                        stopped: Stopped::Error {
                            tx_index: tx.tx_index,
                            message: e.to_string(),
                        },
                    });
                }
            }
        }

        info!(
            first_block = window.0,
            last_block = window.1,
            sent,
            "Distribution batch sent"
        );
        Ok(TickOutcome::Complete { window, sent })
    }
}
