//! Status command.

use stakepay_ops::DistributionStatus;
use stakepay_types::BlockNumber;
use std::path::Path;

use crate::commands::load_history;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, StatusOutput};

/// Execute the status command.
pub fn status(
    config: CliConfig,
    format: OutputFormat,
    history: &Path,
    block: BlockNumber,
) -> CliResult<String> {
    let history = load_history(history)?;
    let status = DistributionStatus::from_history(&history, block, &config.rewards)?;

    Ok(StatusOutput { status }.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use stakepay_test_utils::{test_address, write_history_file, HistoryBuilder};

    #[test]
    fn test_status_before_any_distribution() {
        let history = HistoryBuilder::new(5)
            .delegation(5, test_address(1), 10)
            .processed(9)
            .build();
        let (_dir, path) = write_history_file(&history);

        let out = status(CliConfig::default(), OutputFormat::Json, &path, 9).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["starting_block"], 5);
        assert!(json["latest"].is_null());
        assert_eq!(json["next_window"], serde_json::json!([5, 9]));

        let human = status(CliConfig::default(), OutputFormat::Human, &path, 9).unwrap();
        assert!(human.contains("No distribution yet"));
    }

    #[test]
    fn test_status_missing_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = status(
            CliConfig::default(),
            OutputFormat::Human,
            &dir.path().join("nope.json"),
            1,
        );
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }
}
