//! Stakepay CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

use stakepay_cli::{
    cli::{Cli, Commands},
    commands,
    config::CliConfig,
    error::{CliError, CliResult},
    output::OutputFormat,
};

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on --verbose flag or RUST_LOG env var
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if cli.verbose || has_rust_log {
        let mut filter = EnvFilter::from_default_env();
        if cli.verbose {
            if let Ok(directive) = "stakepay=debug".parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    if let Err(e) = run(cli) {
        print_error(&e);
        std::process::exit(e.exit_code());
    }
}

/// Print a user-friendly error message with a recovery hint.
fn print_error(e: &CliError) {
    eprintln!("{}: {}", "Error".red().bold(), e);

    if let Some(suggestion) = e.suggestion() {
        eprintln!("{}: {}", "Hint".cyan(), suggestion);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load_or_default(cli.config.as_deref())?;
    let format: OutputFormat = cli.format.into();

    let output = match cli.command {
        Commands::Division {
            history,
            from,
            to,
            fraction,
        } => commands::division(config, format, &history, from, to, fraction)?,

        Commands::Plan {
            history,
            block,
            now,
        } => commands::plan(config, format, &history, block, now)?,

        Commands::Status { history, block } => commands::status(config, format, &history, block)?,
    };

    println!("{}", output);

    Ok(())
}
