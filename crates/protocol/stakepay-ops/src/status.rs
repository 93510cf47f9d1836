//! Status report for operators.

use num::Zero;
use serde::Serialize;
use stakepay_econ::Distribution;
use stakepay_types::{serde_amount, Address, Amount, BlockNumber, EventHistory};

use crate::config::Configuration;
use crate::error::OpsResult;
use crate::schedule::next_distribution_due;

/// Progress of the latest distribution window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStatus {
    pub first_block: BlockNumber,
    pub last_block: BlockNumber,
    pub fraction_for_delegators: f64,
    pub complete: bool,
    /// Recipients owed something and paid in full.
    pub recipients_paid: usize,
    /// Recipients with an unpaid amount.
    pub recipients_remaining: usize,
    #[serde(with = "serde_amount")]
    pub total_amount: Amount,
    #[serde(with = "serde_amount")]
    pub remaining_amount: Amount,
    pub confirmed_transactions: usize,
    pub next_tx_index: u32,
    pub last_distribution_time: Option<u64>,
}

impl WindowStatus {
    fn from_distribution(distribution: &Distribution) -> Self {
        let remaining = distribution.remaining();
        let recipients_remaining = remaining.paid_delegator_count()
            + usize::from(!remaining.amount_for_delegate.is_zero());

        Self {
            first_block: distribution.first_block(),
            last_block: distribution.last_block(),
            fraction_for_delegators: distribution.split().fraction_for_delegators,
            complete: distribution.is_complete(),
            recipients_paid: distribution.paid_recipient_count(),
            recipients_remaining,
            total_amount: distribution.division().total(),
            remaining_amount: remaining.total(),
            confirmed_transactions: distribution.previous_transfers().len(),
            next_tx_index: distribution.next_tx_index(),
            last_distribution_time: distribution.last_distribution_time(),
        }
    }
}

/// Where a delegate's distributions stand at one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStatus {
    pub delegate: Address,
    pub starting_block: BlockNumber,
    pub last_processed_block: BlockNumber,
    pub current_block: BlockNumber,
    /// Latest distribution window, if any distribution happened.
    pub latest: Option<WindowStatus>,
    /// Window a new distribution would cover now; `None` while one is in
    /// flight or when no new block exists.
    pub next_window: Option<(BlockNumber, BlockNumber)>,
    /// Earliest time (seconds) the next distribution may start.
    pub next_due_time: u64,
}

impl DistributionStatus {
    /// Build the report for `current_block`.
    pub fn from_history(
        history: &EventHistory,
        current_block: BlockNumber,
        config: &Configuration,
    ) -> OpsResult<Self> {
        config.check_history(history)?;
        let last = Distribution::last(current_block, history, &config.granularity)?;

        let next_first_block = match &last {
            Some(last) if !last.is_complete() => None,
            Some(last) => Some(last.last_block() + 1),
            None => Some(history.starting_block()),
        };
        let next_window = next_first_block
            .filter(|first| *first <= current_block)
            .map(|first| (first, current_block));

        let latest = last.as_ref().map(WindowStatus::from_distribution);
        let next_due_time = next_distribution_due(
            latest.as_ref().and_then(|w| w.last_distribution_time),
            config.distribution_frequency_seconds,
        );

        Ok(Self {
            delegate: history.delegate_address().clone(),
            starting_block: history.starting_block(),
            last_processed_block: history.last_processed_block(),
            current_block,
            latest,
            next_window,
            next_due_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::One;
    use stakepay_test_utils::{test_address, test_delegate, HistoryBuilder};
    use stakepay_types::Split;

    fn config() -> Configuration {
        Configuration::default()
            .with_frequency(1_000)
            .with_granularity(Amount::one())
    }

    fn builder() -> HistoryBuilder {
        HistoryBuilder::new(1)
            .committee(1, 1.0)
            .delegation(1, test_address(1), 10)
            .delegation(1, test_address(2), 10)
            .assignment(4, 400)
            .processed(10)
    }

    fn split() -> Split {
        Split::new(0.5).unwrap()
    }

    #[test]
    fn test_status_before_any_distribution() {
        let status = DistributionStatus::from_history(&builder().build(), 10, &config()).unwrap();
        assert!(status.latest.is_none());
        assert_eq!(status.next_window, Some((1, 10)));
        assert_eq!(status.next_due_time, 0);
        assert_eq!(status.delegate, test_delegate());
    }

    #[test]
    fn test_status_in_flight() {
        let history = builder()
            .distribution_at(
                11,
                5_000,
                &[(test_delegate(), 200), (test_address(1), 100)],
                (1, 10),
                split(),
                0,
            )
            .processed(11)
            .build();
        let status = DistributionStatus::from_history(&history, 11, &config()).unwrap();

        let latest = status.latest.unwrap();
        assert!(!latest.complete);
        assert_eq!(latest.recipients_paid, 2);
        assert_eq!(latest.recipients_remaining, 1);
        assert_eq!(latest.total_amount, Amount::from(400u32));
        assert_eq!(latest.remaining_amount, Amount::from(100u32));
        assert_eq!(latest.next_tx_index, 1);
        assert_eq!(status.next_window, None);
        assert_eq!(status.next_due_time, 6_000);
    }

    #[test]
    fn test_status_json_amounts_are_strings() {
        let history = builder()
            .distribution(11, &[(test_delegate(), 200)], (1, 10), split(), 0)
            .processed(12)
            .build();
        let status = DistributionStatus::from_history(&history, 12, &config()).unwrap();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["latest"]["remaining_amount"], "200");
        assert_eq!(json["next_window"], serde_json::Value::Null);
    }
}
