//! Distribution windows and their transaction batches.
//!
//! A distribution pays out the granularity-fixed division of one block
//! window `first_block..=last_block`. It may take several transactions and
//! several ticks; nothing is kept between ticks. Every tick rebuilds the
//! [`Distribution`] from the event history, compares the division with the
//! distribution events already confirmed for the window, and plans only what
//! is still unpaid.
//!
//! # States
//!
//! - Not started: no distribution event exists for the window.
//! - In progress: some transfers are confirmed, some amounts remain.
//! - Complete: at least one transfer is confirmed and nothing remains.
//!
//! Only one distribution may be in progress at a time.

use std::collections::BTreeMap;

use num::Zero;
use stakepay_types::{
    Address, Amount, BlockNumber, Division, DistributionEvent, EventHistory, PlannedTransaction,
    Split, MIN_RECIPIENTS_PER_TX,
};
use tracing::{debug, info};

use crate::calculator::calc_division_for_block_period;
use crate::error::{EconError, EconResult};
use crate::granularity::fix_division_granularity;

/// One distribution window, rebuilt from history.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    first_block: BlockNumber,
    last_block: BlockNumber,
    split: Split,
    delegate: Address,
    division: Division,
    previous_transfers: Vec<DistributionEvent>,
}

fn check_current_block(current_block: BlockNumber, history: &EventHistory) -> EconResult<()> {
    if current_block > history.last_processed_block() {
        return Err(EconError::BlockOutOfBounds {
            block: current_block,
            last_processed_block: history.last_processed_block(),
        });
    }
    Ok(())
}

impl Distribution {
    fn for_window(
        first_block: BlockNumber,
        last_block: BlockNumber,
        split: Split,
        current_block: BlockNumber,
        history: &EventHistory,
        granularity: &Amount,
    ) -> EconResult<Self> {
        let division = calc_division_for_block_period(first_block, last_block, &split, history)?;
        let division = fix_division_granularity(&division, granularity)?;

        let mut previous_transfers: Vec<DistributionEvent> = history
            .distribution_events()
            .iter()
            .filter(|e| e.block <= current_block && e.is_for_window(first_block, last_block))
            .cloned()
            .collect();
        previous_transfers.sort_by_key(|e| e.batch_tx_index);

        Ok(Self {
            first_block,
            last_block,
            split,
            delegate: history.delegate_address().clone(),
            division,
            previous_transfers,
        })
    }

    /// The latest distribution window seen up to `current_block`, if any.
    ///
    /// Windows are ordered by `(first_block, last_block)`, not by the order
    /// their events were recorded in. The split is the one of the window's
    /// lowest transaction index.
    pub fn last(
        current_block: BlockNumber,
        history: &EventHistory,
        granularity: &Amount,
    ) -> EconResult<Option<Self>> {
        check_current_block(current_block, history)?;

        let visible = || {
            history
                .distribution_events()
                .iter()
                .filter(move |e| e.block <= current_block)
        };
        let Some((first_block, last_block)) = visible().map(DistributionEvent::window).max() else {
            return Ok(None);
        };
        let split = visible()
            .filter(|e| e.is_for_window(first_block, last_block))
            .min_by_key(|e| e.batch_tx_index)
            .map(|e| e.batch_split);
        let Some(split) = split else {
            return Ok(None);
        };

        let distribution = Self::for_window(
            first_block,
            last_block,
            split,
            current_block,
            history,
            granularity,
        )?;
        Ok(Some(distribution))
    }

    /// Open the window that follows the last distribution, up to
    /// `current_block`.
    ///
    /// Fails while the last distribution is incomplete. Without any prior
    /// distribution the window starts at the history's starting block.
    pub fn start_new(
        current_block: BlockNumber,
        split: Split,
        history: &EventHistory,
        granularity: &Amount,
    ) -> EconResult<Self> {
        check_current_block(current_block, history)?;

        let first_block = match Self::last(current_block, history, granularity)? {
            Some(last) if !last.is_complete() => {
                return Err(EconError::ConcurrentDistribution {
                    first_block: last.first_block,
                    last_block: last.last_block,
                });
            }
            Some(last) => last.last_block + 1,
            None => history.starting_block(),
        };

        if first_block > current_block {
            return Err(EconError::NothingToDistribute {
                first_block,
                current_block,
            });
        }

        let distribution =
            Self::for_window(first_block, current_block, split, current_block, history, granularity)?;
        info!(
            first_block,
            last_block = current_block,
            fraction_for_delegators = split.fraction_for_delegators,
            delegators = distribution.division.paid_delegator_count(),
            "Started new distribution"
        );
        Ok(distribution)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn first_block(&self) -> BlockNumber {
        self.first_block
    }

    pub fn last_block(&self) -> BlockNumber {
        self.last_block
    }

    /// `(first_block, last_block)`.
    pub fn window(&self) -> (BlockNumber, BlockNumber) {
        (self.first_block, self.last_block)
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// The granularity-fixed division this window pays out.
    pub fn division(&self) -> &Division {
        &self.division
    }

    /// Confirmed transfers of this window, by transaction index.
    pub fn previous_transfers(&self) -> &[DistributionEvent] {
        &self.previous_transfers
    }

    /// Largest timestamp among the confirmed transfers.
    pub fn last_distribution_time(&self) -> Option<u64> {
        self.previous_transfers.iter().map(|e| e.timestamp).max()
    }

    /// Transaction index the next planned transaction will use.
    pub fn next_tx_index(&self) -> u32 {
        self.previous_transfers
            .iter()
            .map(|e| e.batch_tx_index + 1)
            .max()
            .unwrap_or(0)
    }

    // =========================================================================
    // Progress
    // =========================================================================

    fn paid_by_recipient(&self) -> BTreeMap<&Address, Amount> {
        let mut paid: BTreeMap<&Address, Amount> = BTreeMap::new();
        for (recipient, amount) in self.previous_transfers.iter().flat_map(|e| e.transfers()) {
            *paid.entry(recipient).or_insert_with(Amount::zero) += amount;
        }
        paid
    }

    /// What is still unpaid, recipient by recipient.
    ///
    /// Recipients that are fully paid are left out. Overpayments count as
    /// fully paid.
    pub fn remaining(&self) -> Division {
        let paid = self.paid_by_recipient();
        let unpaid = |recipient: &Address, owed: &Amount| match paid.get(recipient) {
            Some(done) if done >= owed => Amount::zero(),
            Some(done) => owed - done,
            None => owed.clone(),
        };

        let amounts_without_delegate = self
            .division
            .amounts_without_delegate
            .iter()
            .map(|(delegator, owed)| (delegator.clone(), unpaid(delegator, owed)))
            .filter(|(_, left)| !left.is_zero())
            .collect();

        Division {
            amounts_without_delegate,
            amount_for_delegate: unpaid(&self.delegate, &self.division.amount_for_delegate),
        }
    }

    /// Number of recipients, delegate included, that are owed something and
    /// have been paid in full.
    pub fn paid_recipient_count(&self) -> usize {
        let remaining = self.remaining();
        let delegators = self.division.paid_delegator_count() - remaining.paid_delegator_count();
        let delegate = !self.division.amount_for_delegate.is_zero()
            && remaining.amount_for_delegate.is_zero();
        delegators + usize::from(delegate)
    }

    /// Whether the window is fully paid.
    ///
    /// A window with nothing owed still needs one recorded transfer to count
    /// as complete.
    pub fn is_complete(&self) -> bool {
        if self.previous_transfers.is_empty() {
            return false;
        }
        let remaining = self.remaining();
        remaining.amounts_without_delegate.is_empty() && remaining.amount_for_delegate.is_zero()
    }

    /// Plan the transactions that pay everything still unpaid.
    ///
    /// Each transaction carries the delegate first, then at most
    /// `max_recipients_per_tx - 1` delegators in address order. The delegate's
    /// remaining amount rides in the first transaction. Returns an empty batch
    /// once the window is complete.
    pub fn prepare_transaction_batch(
        &self,
        max_recipients_per_tx: usize,
    ) -> EconResult<Vec<PlannedTransaction>> {
        if max_recipients_per_tx < MIN_RECIPIENTS_PER_TX {
            return Err(EconError::InvalidBatchSize {
                max: max_recipients_per_tx,
                min: MIN_RECIPIENTS_PER_TX,
            });
        }
        if self.is_complete() {
            return Ok(Vec::new());
        }

        let remaining = self.remaining();
        let delegators: Vec<(Address, Amount)> =
            remaining.amounts_without_delegate.into_iter().collect();
        let mut chunks: Vec<&[(Address, Amount)]> =
            delegators.chunks(max_recipients_per_tx - 1).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }

        let first_index = self.next_tx_index();
        let mut delegate_amount = remaining.amount_for_delegate;
        let mut batch = Vec::with_capacity(chunks.len());
        for (offset, chunk) in chunks.into_iter().enumerate() {
            let mut recipients = Vec::with_capacity(chunk.len() + 1);
            let mut amounts = Vec::with_capacity(chunk.len() + 1);
            recipients.push(self.delegate.clone());
            amounts.push(std::mem::take(&mut delegate_amount));
            for (delegator, amount) in chunk {
                recipients.push(delegator.clone());
                amounts.push(amount.clone());
            }

            let tx_index = first_index + offset as u32;
            debug!(tx_index, recipients = recipients.len(), "Planned distribution transaction");
            batch.push(PlannedTransaction::new(
                recipients,
                amounts,
                tx_index,
                self.first_block,
                self.last_block,
                self.split,
            ));
        }

        info!(
            first_block = self.first_block,
            last_block = self.last_block,
            transactions = batch.len(),
            first_tx_index = first_index,
            "Prepared transaction batch"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakepay_test_utils::{test_address, test_delegate, HistoryBuilder};

    fn amount(n: u64) -> Amount {
        Amount::from(n)
    }

    fn split() -> Split {
        Split {
            fraction_for_delegators: 0.5,
        }
    }

    fn granularity() -> Amount {
        amount(1)
    }

    /// Committee weight 1 from block 1; four equal delegators; 800 assigned
    /// at block 4. Delegate keeps 400, each delegator gets 100.
    fn four_delegators() -> HistoryBuilder {
        let mut builder = HistoryBuilder::new(1).committee(1, 1.0);
        for n in 1..=4 {
            builder = builder.delegation(1, test_address(n), 10);
        }
        builder.assignment(4, 800)
    }

    #[test]
    fn test_last_none_without_events() {
        let history = four_delegators().processed(10).build();
        assert!(Distribution::last(10, &history, &granularity())
            .unwrap()
            .is_none());
        assert!(matches!(
            Distribution::last(11, &history, &granularity()),
            Err(EconError::BlockOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_start_new_first_window_from_starting_block() {
        let history = four_delegators().processed(10).build();
        let distribution = Distribution::start_new(10, split(), &history, &granularity()).unwrap();

        assert_eq!(distribution.window(), (1, 10));
        assert_eq!(distribution.division().amount_for_delegate, amount(400));
        assert_eq!(distribution.division().amount_for(&test_address(1)), amount(100));
        assert!(!distribution.is_complete());
        assert_eq!(distribution.next_tx_index(), 0);
    }

    #[test]
    fn test_batch_chunks_delegators_behind_delegate() {
        let history = four_delegators().processed(10).build();
        let distribution = Distribution::start_new(10, split(), &history, &granularity()).unwrap();

        let batch = distribution.prepare_transaction_batch(3).unwrap();
        assert_eq!(batch.len(), 2);

        assert_eq!(batch[0].tx_index, 0);
        assert_eq!(
            batch[0].recipient_addresses,
            vec![test_delegate(), test_address(1), test_address(2)]
        );
        assert_eq!(batch[0].amounts, vec![amount(400), amount(100), amount(100)]);
        assert_eq!(batch[0].total_amount, amount(600));

        assert_eq!(batch[1].tx_index, 1);
        assert_eq!(
            batch[1].recipient_addresses,
            vec![test_delegate(), test_address(3), test_address(4)]
        );
        assert_eq!(batch[1].amounts, vec![amount(0), amount(100), amount(100)]);
        assert!(batch.iter().all(|tx| tx.first_block == 1 && tx.last_block == 10));
    }

    #[test]
    fn test_batch_size_must_fit_delegate_and_delegator() {
        let history = four_delegators().processed(10).build();
        let distribution = Distribution::start_new(10, split(), &history, &granularity()).unwrap();
        assert_eq!(
            distribution.prepare_transaction_batch(1),
            Err(EconError::InvalidBatchSize { max: 1, min: 2 })
        );
    }

    #[test]
    fn test_resume_plans_only_unpaid() {
        let history = four_delegators()
            .processed(10)
            .distribution(
                12,
                &[(test_delegate(), 400), (test_address(1), 100), (test_address(2), 100)],
                (1, 10),
                split(),
                0,
            )
            .processed(12)
            .build();

        let distribution = Distribution::last(12, &history, &granularity())
            .unwrap()
            .unwrap();
        assert_eq!(distribution.window(), (1, 10));
        assert!(!distribution.is_complete());
        assert_eq!(distribution.paid_recipient_count(), 3);

        let batch = distribution.prepare_transaction_batch(3).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].tx_index, 1);
        assert_eq!(
            batch[0].recipient_addresses,
            vec![test_delegate(), test_address(3), test_address(4)]
        );
        assert_eq!(batch[0].amounts, vec![amount(0), amount(100), amount(100)]);

        // Starting another window while this one is unpaid is refused
        assert_eq!(
            Distribution::start_new(12, split(), &history, &granularity()),
            Err(EconError::ConcurrentDistribution {
                first_block: 1,
                last_block: 10
            })
        );
    }

    #[test]
    fn test_complete_window_and_next_window() {
        let history = four_delegators()
            .processed(10)
            .distribution(
                11,
                &[(test_delegate(), 400), (test_address(1), 100), (test_address(2), 100)],
                (1, 10),
                split(),
                0,
            )
            .distribution(
                11,
                &[(test_delegate(), 0), (test_address(3), 100), (test_address(4), 100)],
                (1, 10),
                split(),
                1,
            )
            .processed(20)
            .build();

        let last = Distribution::last(20, &history, &granularity())
            .unwrap()
            .unwrap();
        assert!(last.is_complete());
        assert!(last.prepare_transaction_batch(3).unwrap().is_empty());
        assert_eq!(last.paid_recipient_count(), 5);

        let next = Distribution::start_new(20, split(), &history, &granularity()).unwrap();
        assert_eq!(next.window(), (11, 20));
        // No assignment after block 10: a single delegate-only transaction
        let batch = next.prepare_transaction_batch(3).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].recipient_addresses, vec![test_delegate()]);
        assert_eq!(batch[0].amounts, vec![amount(0)]);
    }

    #[test]
    fn test_nothing_to_distribute_when_window_reaches_current_block() {
        let everyone: Vec<(Address, u64)> = std::iter::once((test_delegate(), 400))
            .chain((1..=4).map(|n| (test_address(n), 100)))
            .collect();
        let history = four_delegators()
            .processed(10)
            .distribution(10, &everyone, (1, 10), split(), 0)
            .build();

        assert!(Distribution::last(10, &history, &granularity())
            .unwrap()
            .unwrap()
            .is_complete());
        assert_eq!(
            Distribution::start_new(10, split(), &history, &granularity()),
            Err(EconError::NothingToDistribute {
                first_block: 11,
                current_block: 10
            })
        );
    }

    #[test]
    fn test_transfers_after_current_block_are_ignored() {
        let history = four_delegators()
            .processed(10)
            .distribution(
                15,
                &[(test_delegate(), 400), (test_address(1), 100)],
                (1, 10),
                split(),
                0,
            )
            .processed(20)
            .build();

        assert!(Distribution::last(14, &history, &granularity())
            .unwrap()
            .is_none());
        let seen = Distribution::last(15, &history, &granularity())
            .unwrap()
            .unwrap();
        assert_eq!(seen.previous_transfers().len(), 1);
    }

    #[test]
    fn test_last_distribution_time() {
        let history = four_delegators()
            .processed(10)
            .distribution_at(
                11,
                1_000,
                &[(test_delegate(), 400), (test_address(1), 100), (test_address(2), 100)],
                (1, 10),
                split(),
                0,
            )
            .distribution_at(
                12,
                2_000,
                &[(test_delegate(), 0), (test_address(3), 100), (test_address(4), 100)],
                (1, 10),
                split(),
                1,
            )
            .processed(12)
            .build();

        let last = Distribution::last(12, &history, &granularity())
            .unwrap()
            .unwrap();
        assert_eq!(last.last_distribution_time(), Some(2_000));
    }

    #[test]
    fn test_split_comes_from_lowest_tx_index() {
        let other = Split {
            fraction_for_delegators: 0.25,
        };
        let history = four_delegators()
            .processed(10)
            .distribution(11, &[(test_delegate(), 0)], (1, 10), other, 1)
            .distribution(11, &[(test_delegate(), 0)], (1, 10), split(), 0)
            .processed(11)
            .build();

        let last = Distribution::last(11, &history, &granularity())
            .unwrap()
            .unwrap();
        assert_eq!(last.split(), split());
        assert_eq!(last.previous_transfers()[0].batch_tx_index, 0);
        assert_eq!(last.next_tx_index(), 2);
    }
}
