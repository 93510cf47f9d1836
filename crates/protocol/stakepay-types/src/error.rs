//! Error types for data-model invariants.

use thiserror::Error;

use crate::events::BlockNumber;

/// Result type alias for data-model operations.
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors raised when data would violate an `EventHistory` invariant.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TypesError {
    /// Address is not 20 hex-encoded bytes.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Event is older than the last event of the same stream.
    #[error("{stream} event at block {block} is older than the last one at block {last}")]
    UnsortedEvent {
        /// Which event stream
        stream: &'static str,
        /// Block of the rejected event
        block: BlockNumber,
        /// Block of the newest stored event
        last: BlockNumber,
    },

    /// Event lies before the history's starting block.
    #[error("{stream} event at block {block} precedes starting block {starting_block}")]
    BeforeStartingBlock {
        /// Which event stream
        stream: &'static str,
        /// Block of the rejected event
        block: BlockNumber,
        /// First block covered by the history
        starting_block: BlockNumber,
    },

    /// Committee weight outside `[0, 1]`.
    #[error("relative committee weight {weight} is outside [0, 1]")]
    InvalidWeight {
        /// The rejected weight
        weight: f64,
    },

    /// Split fraction outside `[0, 1]`.
    #[error("fraction for delegators {fraction} is outside [0, 1]")]
    InvalidSplit {
        /// The rejected fraction
        fraction: f64,
    },

    /// Distribution event with a malformed recipient list.
    #[error("distribution event at block {block}: {reason}")]
    MalformedDistribution {
        /// Block of the rejected event
        block: BlockNumber,
        /// What is wrong with it
        reason: String,
    },

    /// Attempt to move `last_processed_block` backwards.
    #[error("last processed block cannot move from {current} back to {requested}")]
    ProcessedBlockRegression {
        /// Current last processed block
        current: BlockNumber,
        /// Requested value
        requested: BlockNumber,
    },

    /// History file could not be read or written.
    #[error("history I/O error: {0}")]
    Io(String),

    /// History file is not valid JSON for an `EventHistory`.
    #[error("history JSON error: {0}")]
    Json(String),
}

impl TypesError {
    /// Create a new InvalidAddress error.
    pub fn invalid_address(input: impl Into<String>) -> Self {
        Self::InvalidAddress(input.into())
    }

    /// Create a new MalformedDistribution error.
    pub fn malformed_distribution(block: BlockNumber, reason: impl Into<String>) -> Self {
        Self::MalformedDistribution {
            block,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for TypesError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for TypesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TypesError::UnsortedEvent {
            stream: "assignment",
            block: 3,
            last: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("assignment"));
        assert!(msg.contains('3'));
        assert!(msg.contains('7'));

        let err = TypesError::ProcessedBlockRegression {
            current: 10,
            requested: 9,
        };
        assert!(err.to_string().contains("back to 9"));

        let err = TypesError::malformed_distribution(4, "no recipients");
        assert!(err.to_string().contains("no recipients"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TypesError = io.into();
        assert!(matches!(err, TypesError::Io(_)));
    }
}
