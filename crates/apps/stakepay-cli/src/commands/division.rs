//! Division command.

use stakepay_econ::{calc_division_for_block_period, fix_division_granularity};
use stakepay_types::{BlockNumber, Split};
use std::path::Path;

use crate::commands::load_history;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{DivisionOutput, OutputFormat, Render};

/// Execute the division command.
pub fn division(
    config: CliConfig,
    format: OutputFormat,
    history: &Path,
    from: BlockNumber,
    to: BlockNumber,
    fraction: Option<f64>,
) -> CliResult<String> {
    let history = load_history(history)?;
    config.rewards.check_history(&history)?;

    let split = match fraction {
        Some(fraction) => Split::new(fraction)?,
        None => config.rewards.split(),
    };
    let raw = calc_division_for_block_period(from, to, &split, &history)?;
    let division = fix_division_granularity(&raw, &config.rewards.granularity)?;

    let output = DivisionOutput {
        delegate: history.delegate_address().clone(),
        first_block: from,
        last_block: to,
        fraction_for_delegators: split.fraction_for_delegators,
        granularity: config.rewards.granularity.clone(),
        total: division.total(),
        division,
    };

    Ok(output.render(format))
}
