//! When a new distribution is due.

/// Whether enough time has passed since the last distribution to start a
/// new one.
///
/// `last_distribution_time` is `None` before the first distribution, which
/// is always due. Times are in seconds.
pub fn should_start_distribution(
    last_distribution_time: Option<u64>,
    now: u64,
    frequency_seconds: u64,
) -> bool {
    match last_distribution_time {
        None => true,
        Some(last) => now.saturating_sub(last) >= frequency_seconds,
    }
}

/// Earliest time the next distribution may start.
pub fn next_distribution_due(last_distribution_time: Option<u64>, frequency_seconds: u64) -> u64 {
    last_distribution_time
        .map(|last| last.saturating_add(frequency_seconds))
        .unwrap_or(0)
}
