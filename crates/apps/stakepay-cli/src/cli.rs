//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use stakepay_types::BlockNumber;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Stakepay CLI.
#[derive(Parser, Debug)]
#[command(name = "stakepay")]
#[command(author = "Stakepay Contributors")]
#[command(version)]
#[command(about = "Inspect and plan delegator reward distributions")]
#[command(
    long_about = "Stakepay divides the rewards assigned to a delegate among its delegators.\n\nEvery command works offline on an event history stored as JSON."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "STAKEPAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Divide the rewards of a block range.
    ///
    /// Prints the delegate's and every delegator's share, floored to the
    /// configured granularity.
    Division {
        /// Event history JSON file.
        #[arg(long)]
        history: PathBuf,

        /// First block of the range.
        #[arg(long)]
        from: BlockNumber,

        /// Last block of the range (inclusive).
        #[arg(long)]
        to: BlockNumber,

        /// Fraction for delegators (defaults to the configured one).
        #[arg(long, value_parser = parse_fraction)]
        fraction: Option<f64>,
    },

    /// Plan the next distribution transactions.
    ///
    /// Resumes an incomplete distribution or opens the next window.
    /// Nothing is sent.
    Plan {
        /// Event history JSON file.
        #[arg(long)]
        history: PathBuf,

        /// Current block.
        #[arg(long)]
        block: BlockNumber,

        /// Current time in seconds; when set, a new window is only opened
        /// once the distribution frequency has elapsed.
        #[arg(long)]
        now: Option<u64>,
    },

    /// Show where distributions stand.
    Status {
        /// Event history JSON file.
        #[arg(long)]
        history: PathBuf,

        /// Current block.
        #[arg(long)]
        block: BlockNumber,
    },
}

/// Parse a fraction in `[0, 1]`.
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("fraction must be within [0, 1], got {}", value));
    }
    Ok(value)
}
