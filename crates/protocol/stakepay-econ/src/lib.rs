//! Reward division and distribution planning for a delegate.
//!
//! This crate turns a delegate's [`EventHistory`](stakepay_types::EventHistory)
//! into payments:
//!
//! - **Accumulators**: replay committee and delegation events block by block
//! - **Calculator**: divide every reward assignment among delegators by their
//!   weight in the committee over the blocks it pays for
//! - **Granularity**: floor amounts to the transfer unit without losing any
//! - **Distribution**: derive the current distribution window from history and
//!   plan the transactions still needed to pay it out
//!
//! Everything here is synchronous and free of I/O. Results depend only on the
//! history snapshot passed in, so a distribution can be rebuilt from scratch
//! on every tick.
//!
//! # Example
//!
//! ```
//! use stakepay_econ::calc_division_for_block_period;
//! use stakepay_types::{Address, Amount, EventHistory, Split};
//!
//! let delegate = Address::parse("0xdddddddddddddddddddddddddddddddddddddddd").unwrap();
//! let delegator = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
//!
//! let mut history = EventHistory::new(delegate, 1);
//! history.push_committee_change(1, 0.5).unwrap();
//! history.push_delegation_change(1, delegator.clone(), Amount::from(100u32)).unwrap();
//! history.push_assignment(5, Amount::from(10_000u32)).unwrap();
//! history.mark_processed(5).unwrap();
//!
//! let split = Split::new(0.6).unwrap();
//! let division = calc_division_for_block_period(1, 5, &split, &history).unwrap();
//!
//! assert_eq!(division.amount_for(&delegator), Amount::from(6_000u32));
//! assert_eq!(division.amount_for_delegate, Amount::from(4_000u32));
//! ```
//!
//! # Division Algorithm
//!
//! For each assignment:
//!
//! 1. **Split**: `amount * fraction_for_delegators` (half-up) goes to the
//!    delegator pool, the exact complement to the delegate
//! 2. **Weights**: each delegator accumulates
//!    `relative_weight_in_delegate * delegate_weight_in_committee` over every
//!    block since the previous assignment
//! 3. **Shares**: the pool is divided in proportion to those sums; the
//!    delegate's own stake is not paid out as a delegator share
//! 4. **Residue**: whatever rounding leaves goes to the delegate

pub mod accumulator;
pub mod calculator;
pub mod distribution;
pub mod error;
pub mod fixed;
pub mod granularity;

pub use error::{EconError, EconResult};

// Accumulators
pub use accumulator::{CommitteeAccumulator, DelegationsAccumulator, DelegationsSnapshot};

// Calculator
pub use calculator::{
    calc_division_for_block_period, calc_division_for_single_assignment,
    find_lowest_closest_index_to_block,
};

// Granularity
pub use granularity::{
    fix_division_granularity, split_amount_in_proportion_with_granularity, ResiduePolicy,
};

// Fixed-point helpers
pub use fixed::{divide_as_number, multiply_by_number};

// Distribution
pub use distribution::Distribution;
