//! Event-sourced cursors over an [`EventHistory`].
//!
//! Each accumulator replays one event stream forward and answers "what was
//! the state at block `b`" for non-decreasing `b`. They are single-reader
//! cursors: every calculation creates fresh instances and owns them.

use std::collections::BTreeMap;

use num::Zero;
use stakepay_types::{Address, Amount, BlockNumber, EventHistory};

use crate::error::{EconError, EconResult};
use crate::fixed::divide_as_number;

fn check_query(
    history: &EventHistory,
    block: BlockNumber,
    current_block: BlockNumber,
) -> EconResult<()> {
    if block > history.last_processed_block() {
        return Err(EconError::BlockOutOfBounds {
            block,
            last_processed_block: history.last_processed_block(),
        });
    }
    if block < current_block {
        return Err(EconError::Backwards {
            block,
            current_block,
        });
    }
    Ok(())
}

// =============================================================================
// Committee
// =============================================================================

/// The delegate's relative weight in the committee, block by block.
#[derive(Debug)]
pub struct CommitteeAccumulator<'a> {
    history: &'a EventHistory,
    next_index: usize,
    current_state: f64,
    current_block: BlockNumber,
}

impl<'a> CommitteeAccumulator<'a> {
    pub fn new(history: &'a EventHistory) -> Self {
        Self {
            history,
            next_index: 0,
            current_state: 0.0,
            current_block: 0,
        }
    }

    /// Relative committee weight in effect at `block`.
    ///
    /// Zero until the first committee change event applies.
    pub fn for_block(&mut self, block: BlockNumber) -> EconResult<f64> {
        check_query(self.history, block, self.current_block)?;

        let events = self.history.committee_change_events();
        while let Some(event) = events.get(self.next_index) {
            if event.block > block {
                break;
            }
            self.current_state = event.new_relative_weight_in_committee;
            self.next_index += 1;
        }
        self.current_block = block;

        Ok(self.current_state)
    }
}

// =============================================================================
// Delegations
// =============================================================================

/// Delegation state of a delegate at one block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelegationsSnapshot {
    /// Absolute stake of every current delegator.
    pub stake: BTreeMap<Address, Amount>,
    /// Each delegator's share of the delegate's total stake.
    pub relative_weight: BTreeMap<Address, f64>,
}

impl DelegationsSnapshot {
    /// Sum of all delegated stake.
    pub fn total_stake(&self) -> Amount {
        self.stake.values().sum()
    }

    fn apply(&mut self, delegator: &Address, new_stake: &Amount) -> EconResult<()> {
        if new_stake.is_zero() {
            self.stake.remove(delegator);
            self.relative_weight.remove(delegator);
        } else {
            self.stake.insert(delegator.clone(), new_stake.clone());
        }

        // With an empty stake map the previous weights are kept as they are.
        let total = self.total_stake();
        if total.is_zero() {
            return Ok(());
        }

        let mut relative_weight = BTreeMap::new();
        for (address, stake) in &self.stake {
            relative_weight.insert(address.clone(), divide_as_number(stake, &total)?);
        }
        self.relative_weight = relative_weight;
        Ok(())
    }
}

/// Delegator stakes and relative weights, block by block.
#[derive(Debug)]
pub struct DelegationsAccumulator<'a> {
    history: &'a EventHistory,
    next_index: usize,
    current_state: DelegationsSnapshot,
    current_block: BlockNumber,
}

impl<'a> DelegationsAccumulator<'a> {
    pub fn new(history: &'a EventHistory) -> Self {
        Self {
            history,
            next_index: 0,
            current_state: DelegationsSnapshot::default(),
            current_block: 0,
        }
    }

    /// Delegation state in effect at `block`.
    ///
    /// Relative weights are recomputed over all delegators after every
    /// applied event.
    pub fn for_block(&mut self, block: BlockNumber) -> EconResult<&DelegationsSnapshot> {
        check_query(self.history, block, self.current_block)?;

        let events = self.history.delegation_change_events();
        while let Some(event) = events.get(self.next_index) {
            if event.block > block {
                break;
            }
            self.current_state
                .apply(&event.delegator_address, &event.new_delegated_stake)?;
            self.next_index += 1;
        }
        self.current_block = block;

        Ok(&self.current_state)
    }
}
