//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

pub use crate::commands::backups::BackupsCommands;
pub use crate::commands::proxy::ProxyCommands;

/// acestep-update - Keep an ACE-Step checkout up to date
#[derive(Parser, Debug)]
#[command(name = "acestep-update")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory inside the checkout to update
    #[arg(long, global = true, default_value = ".", env = "ACESTEP_REPO")]
    pub repo: Utf8PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check for updates and apply them (default)
    Check(CheckArgs),

    /// Inspect, restore and delete update backups
    #[command(subcommand)]
    Backups(BackupsCommands),

    /// Manage the proxy used for fetching
    #[command(subcommand)]
    Proxy(ProxyCommands),
}

// Check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Answer yes to every confirmation (backups are still taken)
    #[arg(short, long)]
    pub yes: bool,
}
