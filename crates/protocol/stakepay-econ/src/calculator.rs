//! Division of reward assignments among delegators.
//!
//! Every assignment pays for the blocks since the previous assignment. Over
//! those blocks each delegator earns, per block, its relative weight in the
//! delegate times the delegate's relative weight in the committee. The
//! delegator pool of the assignment is shared in proportion to those sums,
//! and the delegate absorbs whatever rounding leaves over.

use std::collections::BTreeMap;

use num::Zero;
use stakepay_types::{Address, Amount, BlockEvent, BlockNumber, Division, EventHistory, Split};
use tracing::debug;

use crate::accumulator::{CommitteeAccumulator, DelegationsAccumulator};
use crate::error::{EconError, EconResult};
use crate::fixed::multiply_by_number;

/// Index of the first event whose block is `>= block`.
///
/// Events must be sorted by block. With duplicate blocks the leftmost match
/// is returned; `None` when every event is older than `block`.
pub fn find_lowest_closest_index_to_block<E: BlockEvent>(
    block: BlockNumber,
    events: &[E],
) -> Option<usize> {
    let index = events.partition_point(|e| e.block() < block);
    (index < events.len()).then_some(index)
}

fn check_split(split: &Split) -> EconResult<()> {
    if !split.is_valid() {
        return Err(EconError::InvalidSplit {
            fraction: split.fraction_for_delegators,
        });
    }
    Ok(())
}

/// Take back units handed out by half-up rounding beyond what is available.
///
/// One unit at a time from the currently largest amount, lowest address
/// first on ties.
fn trim_overallocation(amounts: &mut BTreeMap<Address, Amount>, mut excess: Amount) {
    while !excess.is_zero() {
        let largest = amounts
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .max_by(|(left_address, left), (right_address, right)| {
                left.cmp(right).then_with(|| right_address.cmp(left_address))
            })
            .map(|(address, _)| address.clone());
        let Some(amount) = largest.and_then(|address| amounts.get_mut(&address)) else {
            break;
        };
        *amount -= 1u32;
        excess -= 1u32;
    }
}

/// Divide the assignment at `index` among the delegators and the delegate.
///
/// Both accumulators must not have been queried past the first block this
/// assignment pays for.
pub fn calc_division_for_single_assignment(
    index: usize,
    split: &Split,
    committee: &mut CommitteeAccumulator<'_>,
    delegations: &mut DelegationsAccumulator<'_>,
    history: &EventHistory,
) -> EconResult<Division> {
    let assignments = history.assignment_events();
    let assignment = assignments.get(index).ok_or(EconError::IndexOutOfBounds {
        index,
        len: assignments.len(),
    })?;
    check_split(split)?;

    let amount_for_delegators = multiply_by_number(&assignment.amount, split.fraction_for_delegators)?;
    let amount_for_delegate_from_split = &assignment.amount - &amount_for_delegators;

    let last_block = assignment.block;
    let first_block = match index {
        0 => history.starting_block(),
        _ => assignments[index - 1].block + 1,
    }
    .min(last_block);

    let mut weights: BTreeMap<Address, f64> = BTreeMap::new();
    for block in first_block..=last_block {
        let committee_weight = committee.for_block(block)?;
        let snapshot = delegations.for_block(block)?;
        for (delegator, relative_weight) in &snapshot.relative_weight {
            *weights.entry(delegator.clone()).or_insert(0.0) += relative_weight * committee_weight;
        }
    }

    let total_weight: f64 = weights.values().sum();
    if total_weight <= 0.0 {
        return Ok(Division::delegate_only(assignment.amount.clone()));
    }

    let delegate = history.delegate_address();
    let mut amounts_without_delegate = BTreeMap::new();
    for (delegator, weight) in &weights {
        if delegator == delegate {
            continue;
        }
        let amount = multiply_by_number(&amount_for_delegators, weight / total_weight)?;
        amounts_without_delegate.insert(delegator.clone(), amount);
    }

    let mut distributed: Amount = amounts_without_delegate.values().sum();
    if distributed > assignment.amount {
        trim_overallocation(
            &mut amounts_without_delegate,
            &distributed - &assignment.amount,
        );
        distributed = amounts_without_delegate.values().sum();
    }

    // (amount_for_delegators - distributed) + amount_for_delegate_from_split,
    // kept in one subtraction so the residue may exceed the delegators' pool.
    let amount_for_delegate =
        amount_for_delegators + amount_for_delegate_from_split - distributed;

    Ok(Division {
        amounts_without_delegate,
        amount_for_delegate,
    })
}

/// Divide every assignment made in `first_block..=last_block` and sum the
/// results into one division.
pub fn calc_division_for_block_period(
    first_block: BlockNumber,
    last_block: BlockNumber,
    split: &Split,
    history: &EventHistory,
) -> EconResult<Division> {
    if first_block > last_block {
        return Err(EconError::InvalidBlockRange {
            first_block,
            last_block,
        });
    }
    if last_block > history.last_processed_block() {
        return Err(EconError::BlockOutOfBounds {
            block: last_block,
            last_processed_block: history.last_processed_block(),
        });
    }
    if first_block < history.starting_block() {
        return Err(EconError::BeforeStartingBlock {
            block: first_block,
            starting_block: history.starting_block(),
        });
    }
    check_split(split)?;

    let mut committee = CommitteeAccumulator::new(history);
    let mut delegations = DelegationsAccumulator::new(history);
    let mut division = Division::default();

    let assignments = history.assignment_events();
    let Some(mut index) = find_lowest_closest_index_to_block(first_block, assignments) else {
        return Ok(division);
    };

    let mut processed = 0usize;
    while index < assignments.len() && assignments[index].block <= last_block {
        let single = calc_division_for_single_assignment(
            index,
            split,
            &mut committee,
            &mut delegations,
            history,
        )?;
        division.accumulate(&single);
        index += 1;
        processed += 1;
    }

    debug!(
        first_block,
        last_block,
        assignments = processed,
        delegators = division.amounts_without_delegate.len(),
        "Divided block period"
    );

    Ok(division)
}
