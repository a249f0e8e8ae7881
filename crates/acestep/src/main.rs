//! acestep-update - Self-update for ACE-Step checkouts
//!
//! Exit codes: 0 for success, no-op or a declined prompt; 1 for fatal errors;
//! 2 when the remote could not be fetched.

mod cli;
mod commands;
mod output;
mod progress;
mod prompts;

use acestep_update::{UpdateError, EXIT_FATAL};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        None => commands::check::run(Default::default(), &cli.repo).await,
        Some(Commands::Check(args)) => commands::check::run(args, &cli.repo).await,
        Some(Commands::Backups(cmd)) => commands::backups::run(cmd, &cli.repo).await,
        Some(Commands::Proxy(cmd)) => commands::proxy::run(cmd, &cli.repo).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(report_error(&err)),
    }
}

/// Print the error chain and remediation; returns the exit code
fn report_error(err: &anyhow::Error) -> u8 {
    output::error(&format!("{:#}", err));

    match err.downcast_ref::<UpdateError>() {
        Some(update_err) => {
            if let Some(hint) = update_err.remediation() {
                output::info(&hint);
            }
            update_err.exit_code()
        }
        None => EXIT_FATAL,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // warn by default so log lines do not interleave with prompts
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
