//! Transaction sending for delegator reward distributions.
//!
//! The reward engine plans transactions; this crate defines how they leave
//! the process.
//!
//! # Architecture
//!
//! ```text
//! stakepay-ops                  stakepay-settle
//! ┌────────────────────┐       ┌─────────────────────────┐
//! │ RewardsDistributor │ ────► │ RewardsSender (trait)   │
//! │   tick()           │       │   └─ chain client       │
//! └────────────────────┘       └───────────┬─────────────┘
//!         ▲                                │
//!         │ distribution events            ▼
//!         │                    ┌─────────────────────────┐
//!         └─────────────────── │ Chain                   │
//!                              └─────────────────────────┘
//! ```
//!
//! A sender reports a [`TxReceipt`] per transaction. The distributor stops
//! at the first receipt that is not [`TxStatus::Successful`] and lets the
//! next tick pick up from whatever the chain confirmed.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{SettleError, SettleResult};
pub use traits::RewardsSender;
pub use types::{TxReceipt, TxStatus};
