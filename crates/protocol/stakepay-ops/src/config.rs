//! Configuration for the distribution run-loop.
//!
//! A plain value, validated once where it is loaded. Everything downstream
//! receives numbers that are already known to be in range.

use num::Zero;
use serde::{Deserialize, Serialize};
use stakepay_types::{
    serde_amount, Address, Amount, BlockNumber, EventHistory, Split,
    DEFAULT_DISTRIBUTION_FREQUENCY_SECS, DEFAULT_FRACTION_FOR_DELEGATORS, DEFAULT_GRANULARITY,
    DEFAULT_MAX_RECIPIENTS_PER_TX, MIN_RECIPIENTS_PER_TX,
};

use crate::error::{OpsError, OpsResult};

/// Distribution parameters for one delegate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Configuration {
    /// First block the event history may cover.
    pub ethereum_first_block: BlockNumber,
    /// Minimum time between the end of one distribution and the start of
    /// the next.
    pub distribution_frequency_seconds: u64,
    /// Share of every assignment paid to delegators, in `[0, 1]`.
    pub reward_fraction_for_delegators: f64,
    /// Recipients per transaction, the delegate included.
    pub max_recipients_per_rewards_tx: usize,
    /// Expected delegate; histories of other delegates are refused.
    pub delegate_address: Option<Address>,
    /// Transfer unit every paid amount is a multiple of.
    #[serde(with = "serde_amount")]
    pub granularity: Amount,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            ethereum_first_block: 0,
            distribution_frequency_seconds: DEFAULT_DISTRIBUTION_FREQUENCY_SECS,
            reward_fraction_for_delegators: DEFAULT_FRACTION_FOR_DELEGATORS,
            max_recipients_per_rewards_tx: DEFAULT_MAX_RECIPIENTS_PER_TX,
            delegate_address: None,
            granularity: Amount::from(DEFAULT_GRANULARITY),
        }
    }
}

impl Configuration {
    /// Set the first block.
    pub fn with_first_block(mut self, block: BlockNumber) -> Self {
        self.ethereum_first_block = block;
        self
    }

    /// Set the distribution frequency in seconds.
    pub fn with_frequency(mut self, seconds: u64) -> Self {
        self.distribution_frequency_seconds = seconds;
        self
    }

    /// Set the fraction for delegators.
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.reward_fraction_for_delegators = fraction;
        self
    }

    /// Set the maximum recipients per transaction.
    pub fn with_max_recipients(mut self, max: usize) -> Self {
        self.max_recipients_per_rewards_tx = max;
        self
    }

    /// Set the expected delegate.
    pub fn with_delegate(mut self, delegate: Address) -> Self {
        self.delegate_address = Some(delegate);
        self
    }

    /// Set the transfer granularity.
    pub fn with_granularity(mut self, granularity: Amount) -> Self {
        self.granularity = granularity;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> OpsResult<()> {
        if !self.split().is_valid() {
            return Err(OpsError::config(format!(
                "reward_fraction_for_delegators must be within [0, 1], got {}",
                self.reward_fraction_for_delegators
            )));
        }
        if self.distribution_frequency_seconds == 0 {
            return Err(OpsError::config(
                "distribution_frequency_seconds must be positive",
            ));
        }
        if self.max_recipients_per_rewards_tx < MIN_RECIPIENTS_PER_TX {
            return Err(OpsError::config(format!(
                "max_recipients_per_rewards_tx must be at least {}, got {}",
                MIN_RECIPIENTS_PER_TX, self.max_recipients_per_rewards_tx
            )));
        }
        if self.granularity.is_zero() {
            return Err(OpsError::config("granularity must be positive"));
        }
        Ok(())
    }

    /// The split every new distribution uses.
    pub fn split(&self) -> Split {
        Split {
            fraction_for_delegators: self.reward_fraction_for_delegators,
        }
    }

    /// Check that `history` is one this configuration may act on.
    pub fn check_history(&self, history: &EventHistory) -> OpsResult<()> {
        if let Some(configured) = &self.delegate_address {
            if configured != history.delegate_address() {
                return Err(OpsError::DelegateMismatch {
                    configured: configured.clone(),
                    history: history.delegate_address().clone(),
                });
            }
        }
        if history.starting_block() < self.ethereum_first_block {
            return Err(OpsError::HistoryBeforeFirstBlock {
                starting_block: history.starting_block(),
                first_block: self.ethereum_first_block,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakepay_test_utils::{test_address, test_delegate, HistoryBuilder};

    #[test]
    fn test_default_is_valid() {
        let config = Configuration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.split().fraction_for_delegators, 0.7);
        assert_eq!(config.granularity, Amount::from(DEFAULT_GRANULARITY));
    }

    #[test]
    fn test_validate_rejects_each_field() {
        let bad = [
            Configuration::default().with_fraction(1.5),
            Configuration::default().with_fraction(-0.1),
            Configuration::default().with_frequency(0),
            Configuration::default().with_max_recipients(1),
            Configuration::default().with_granularity(Amount::zero()),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(OpsError::Config(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_check_history() {
        let history = HistoryBuilder::new(100).build();

        assert!(Configuration::default().check_history(&history).is_ok());
        assert!(Configuration::default()
            .with_delegate(test_delegate())
            .with_first_block(100)
            .check_history(&history)
            .is_ok());

        assert!(matches!(
            Configuration::default()
                .with_delegate(test_address(1))
                .check_history(&history),
            Err(OpsError::DelegateMismatch { .. })
        ));
        assert!(matches!(
            Configuration::default()
                .with_first_block(101)
                .check_history(&history),
            Err(OpsError::HistoryBeforeFirstBlock { .. })
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"reward_fraction_for_delegators": 0.6, "granularity": "1000"}"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.reward_fraction_for_delegators, 0.6);
        assert_eq!(config.granularity, Amount::from(1000u32));
        assert_eq!(
            config.max_recipients_per_rewards_tx,
            DEFAULT_MAX_RECIPIENTS_PER_TX
        );
        assert!(config.delegate_address.is_none());
    }
}
