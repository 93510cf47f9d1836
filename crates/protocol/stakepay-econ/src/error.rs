//! Error types for the reward engine.
//!
//! Every variant is a precondition or data-integrity violation. The engine
//! raises them synchronously and never retries; the caller decides whether
//! to try the whole tick again later.

use stakepay_types::{Amount, BlockNumber};
use thiserror::Error;

/// Errors that can occur during reward calculations.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EconError {
    // =========================================================================
    // Block Range Errors
    // =========================================================================
    /// Query beyond the last block known to be complete.
    #[error("block {block} is beyond last processed block {last_processed_block}")]
    BlockOutOfBounds {
        /// The requested block
        block: BlockNumber,
        /// Highest complete block of the history
        last_processed_block: BlockNumber,
    },

    /// Block range whose first block is after its last block.
    #[error("invalid block range {first_block}..={last_block}")]
    InvalidBlockRange {
        /// First block of the range
        first_block: BlockNumber,
        /// Last block of the range
        last_block: BlockNumber,
    },

    /// Query before the first block the history covers.
    #[error("block {block} precedes starting block {starting_block}")]
    BeforeStartingBlock {
        /// The requested block
        block: BlockNumber,
        /// First block covered by the history
        starting_block: BlockNumber,
    },

    /// Accumulator queried with a block lower than its previous query.
    #[error("accumulator cannot go backwards from block {current_block} to {block}")]
    Backwards {
        /// The requested block
        block: BlockNumber,
        /// Block of the previous query
        current_block: BlockNumber,
    },

    /// Assignment index outside the assignment stream.
    #[error("assignment index {index} out of bounds (len: {len})")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// Number of assignment events
        len: usize,
    },

    // =========================================================================
    // Arithmetic Errors
    // =========================================================================
    /// Split fraction outside `[0, 1]`.
    #[error("fraction for delegators {fraction} is outside [0, 1]")]
    InvalidSplit {
        /// The rejected fraction
        fraction: f64,
    },

    /// Multiplier that is negative, NaN or infinite.
    #[error("cannot multiply an amount by {value}")]
    InvalidFraction {
        /// The rejected multiplier
        value: f64,
    },

    /// Division by a zero amount.
    #[error("division by zero")]
    DivisionByZero,

    /// Granularity of zero.
    #[error("granularity must be positive")]
    ZeroGranularity,

    /// Division total is not a multiple of the granularity.
    #[error("division total {total} is not a multiple of granularity {granularity}")]
    IndivisibleTotal {
        /// Total of the division
        total: Amount,
        /// Transfer granularity
        granularity: Amount,
    },

    // =========================================================================
    // Distribution Errors
    // =========================================================================
    /// A distribution is still in flight.
    #[error("distribution of blocks {first_block}..={last_block} is not complete yet")]
    ConcurrentDistribution {
        /// First block of the incomplete window
        first_block: BlockNumber,
        /// Last block of the incomplete window
        last_block: BlockNumber,
    },

    /// No new block to distribute since the last distribution.
    #[error("nothing to distribute: next window would start at {first_block}, current block is {current_block}")]
    NothingToDistribute {
        /// First block the next window would cover
        first_block: BlockNumber,
        /// The current block
        current_block: BlockNumber,
    },

    /// Transactions cannot hold the delegate plus at least one delegator.
    #[error("max recipients per transaction must be at least {min}, got {max}")]
    InvalidBatchSize {
        /// Requested maximum
        max: usize,
        /// Smallest supported maximum
        min: usize,
    },
}

impl EconError {
    /// Whether this is one of the out-of-bounds block range errors.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::BlockOutOfBounds { .. }
                | Self::InvalidBlockRange { .. }
                | Self::BeforeStartingBlock { .. }
        )
    }
}

/// Result type for reward calculations.
pub type EconResult<T> = std::result::Result<T, EconError>;
