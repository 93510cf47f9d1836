//! Plan command.

use num::Zero;
use stakepay_ops::pending_distribution;
use stakepay_types::{Amount, BlockNumber};
use std::path::Path;

use crate::commands::load_history;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{OutputFormat, PlanOutput, Render};

/// Execute the plan command.
///
/// Prints the transactions a tick would send at `block` without sending
/// them.
pub fn plan(
    config: CliConfig,
    format: OutputFormat,
    history: &Path,
    block: BlockNumber,
    now: Option<u64>,
) -> CliResult<String> {
    let history = load_history(history)?;

    let output = match pending_distribution(&config.rewards, &history, block, now)? {
        Some(distribution) => {
            let transactions = distribution
                .prepare_transaction_batch(config.rewards.max_recipients_per_rewards_tx)?;
            PlanOutput {
                window: Some(distribution.window()),
                resumed: !distribution.previous_transfers().is_empty(),
                total: transactions.iter().map(|tx| &tx.total_amount).sum(),
                transactions,
            }
        }
        None => PlanOutput {
            window: None,
            resumed: false,
            total: Amount::zero(),
            transactions: Vec::new(),
        },
    };

    Ok(output.render(format))
}
