//! Command implementations.

mod division;
mod plan;
mod status;

pub use division::division;
pub use plan::plan;
pub use status::status;

use stakepay_types::EventHistory;
use std::path::Path;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Load and validate the event history a command works on.
pub fn load_history(path: &Path) -> CliResult<EventHistory> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let history = EventHistory::load_json(path)?;
    debug!(
        path = %path.display(),
        delegate = %history.delegate_address(),
        last_processed_block = history.last_processed_block(),
        "Loaded event history"
    );
    Ok(history)
}
