//! Data structures for delegator reward distribution.
//!
//! This crate provides the types shared by every stakepay crate. It contains
//! no reward arithmetic, only type definitions, invariant checks and
//! serialization support.
//!
//! # Module Organization
//!
//! - [`address`] - Normalized account addresses
//! - [`amount`] - Arbitrary-precision token amounts and their serde helpers
//! - [`constants`] - Protocol constants (granularity, limits)
//! - [`error`] - The `TypesError` enum
//! - [`events`] - The four on-chain event kinds and `Split`
//! - [`history`] - The append-only `EventHistory` of one delegate
//! - [`division`] - Per-recipient reward divisions
//! - [`settlement`] - Planned distribution transactions
//!
//! # Example
//!
//! ```
//! use stakepay_types::{Address, Amount, EventHistory};
//!
//! let delegate = Address::parse("0xAAAAaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
//! let delegator = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
//!
//! let mut history = EventHistory::new(delegate, 1);
//! history.push_committee_change(1, 0.5).unwrap();
//! history.push_delegation_change(2, delegator, Amount::from(100u32)).unwrap();
//! history.push_assignment(5, Amount::from(10_000u32)).unwrap();
//! history.mark_processed(5).unwrap();
//!
//! assert_eq!(history.last_processed_block(), 5);
//! assert_eq!(history.assignment_events().len(), 1);
//! ```
//!
//! # Type Conventions
//!
//! - Monetary values are [`Amount`] (`num::BigUint`) and serialize as
//!   decimal strings
//! - Relative weights are `f64` in `[0, 1]`
//! - Addresses are normalized to lower case when parsed

/// Crate version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod address;
pub mod amount;
pub mod constants;
pub mod division;
pub mod error;
pub mod events;
pub mod history;
pub mod settlement;

pub use address::Address;
pub use amount::{parse_amount, serde_amount, serde_amount_map, serde_amounts, Amount};
pub use constants::*;
pub use division::Division;
pub use error::{TypesError, TypesResult};
pub use events::{
    AssignmentEvent, BlockEvent, BlockNumber, CommitteeChangeEvent, DelegationChangeEvent,
    DistributionEvent, Split,
};
pub use history::EventHistory;
pub use settlement::PlannedTransaction;
