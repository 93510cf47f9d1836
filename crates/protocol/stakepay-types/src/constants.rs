//! Protocol constants.
//!
//! These constants define the on-chain transfer granularity, the precision
//! of the fixed-point helpers and defaults for the distribution schedule.

// =============================================================================
// Token Units
// =============================================================================

/// Decimals of the reward token (18, as for most ERC-20 tokens).
pub const TOKEN_DECIMALS: u32 = 18;

/// Default on-chain transfer granularity: 10^15 base units (0.001 token).
///
/// The rewards contract only moves multiples of this unit.
pub const DEFAULT_GRANULARITY: u64 = 1_000_000_000_000_000;

// =============================================================================
// Fixed-Point Arithmetic
// =============================================================================

/// Fractional decimal digits kept when dividing two amounts into a weight.
pub const WEIGHT_DECIMAL_PLACES: u32 = 20;

// =============================================================================
// Distribution Schedule
// =============================================================================

/// Default time between two distributions: 14 days.
pub const DEFAULT_DISTRIBUTION_FREQUENCY_SECS: u64 = 14 * 24 * 60 * 60;

/// Default fraction of every assignment paid to delegators.
pub const DEFAULT_FRACTION_FOR_DELEGATORS: f64 = 0.7;

/// Default maximum recipients in one distribution transaction.
pub const DEFAULT_MAX_RECIPIENTS_PER_TX: usize = 50;

/// Minimum recipients per transaction: the delegate plus one delegator.
pub const MIN_RECIPIENTS_PER_TX: usize = 2;
