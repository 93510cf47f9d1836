//! Distribution operations for stakepay.
//!
//! This crate wires the reward engine to the outside world:
//!
//! - **Configuration**: the validated parameters of a delegate's distributions
//! - **Distributor**: the run-loop tick that resumes or starts a distribution
//!   and sends its transactions through a [`RewardsSender`](stakepay_settle::RewardsSender)
//! - **Schedule**: when a new distribution is due
//! - **Status**: a serializable report of where distributions stand
//!
//! The distributor keeps no state between ticks. Progress lives in the event
//! history; a crashed or restarted process picks up from whatever the chain
//! confirmed.

pub mod config;
pub mod distributor;
pub mod error;
pub mod schedule;
pub mod status;

pub use config::Configuration;
pub use distributor::{pending_distribution, RewardsDistributor, Stopped, TickOutcome};
pub use error::{OpsError, OpsResult};
pub use schedule::{next_distribution_due, should_start_distribution};
pub use status::{DistributionStatus, WindowStatus};
