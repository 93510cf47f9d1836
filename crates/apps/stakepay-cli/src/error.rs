//! CLI error types.

use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operations error.
    #[error("{0}")]
    Ops(#[from] stakepay_ops::OpsError),

    /// Reward calculation error.
    #[error("{0}")]
    Econ(#[from] stakepay_econ::EconError),

    /// Invalid history or value.
    #[error("{0}")]
    Types(#[from] stakepay_types::TypesError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Not found: 2
            Self::FileNotFound(_) => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) => 3,
            // History errors: 4
            Self::Types(_) => 4,
            // Calculation errors: 5
            Self::Econ(_) => 5,
            // Operations errors: 6
            Self::Ops(_) => 6,
            // IO errors: 9
            Self::Io(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }

    /// A recovery hint, if one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::FileNotFound(_) => Some("Check the path passed to --history or --config."),
            Self::Config(_) | Self::Toml(_) => {
                Some("Fix the [rewards] section of the configuration file.")
            }
            Self::Econ(e) if e.is_out_of_bounds() => {
                Some("The block must lie between the history's starting and last processed block.")
            }
            Self::Ops(stakepay_ops::OpsError::DelegateMismatch { .. }) => {
                Some("The history belongs to another delegate than the configured one.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::FileNotFound("x".into()).exit_code(), 2);
        assert_eq!(CliError::config("bad").exit_code(), 3);
        let econ = stakepay_econ::EconError::ZeroGranularity;
        assert_eq!(CliError::from(econ).exit_code(), 5);
    }

    #[test]
    fn test_suggestion_for_out_of_bounds() {
        let err = CliError::from(stakepay_econ::EconError::BlockOutOfBounds {
            block: 20,
            last_processed_block: 10,
        });
        assert!(err.suggestion().is_some());
        assert!(CliError::Json(serde_json::from_str::<u8>("x").unwrap_err())
            .suggestion()
            .is_none());
    }
}
