//! Command-line interface for stakepay.
//!
//! This crate provides the `stakepay` binary. Every command reads a
//! delegate's event history from a JSON file and works offline:
//!
//! - **division**: the granularity-fixed division of a block range
//! - **plan**: the transactions the next tick would send
//! - **status**: where the delegate's distributions stand
//!
//! # Quick Start
//!
//! ```bash
//! # Who gets what for blocks 100..=200
//! stakepay division --history history.json --from 100 --to 200
//!
//! # What the next tick would send at block 250
//! stakepay plan --history history.json --block 250
//!
//! # Machine-readable status
//! stakepay --format json status --history history.json --block 250
//! ```
//!
//! # Configuration
//!
//! Distribution parameters come from the `[rewards]` section of the TOML file
//! given with `--config`, or from the defaults.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};
