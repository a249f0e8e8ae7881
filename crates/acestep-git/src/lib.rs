//! # acestep-git
//!
//! The version-control capability consumed by the ACE-Step updater.
//!
//! [`Vcs`] names the operations the update coordinator needs (branch and
//! hash queries, bounded fetch, ancestry, name-only diffs, log, stash, reset,
//! fast-forward pull). [`GitCli`] implements them by running `git`; nothing
//! here reimplements version-control internals.
//!
//! # Example
//!
//! ```no_run
//! use acestep_git::{GitCli, Vcs};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let git = GitCli::new("/opt/ACE-Step");
//! git.ensure_available().await?;
//! git.fetch("origin", Duration::from_secs(10)).await?;
//! let behind = git.is_ancestor("HEAD", "origin/main").await?;
//! # let _ = behind;
//! # Ok(())
//! # }
//! ```

mod cli;
pub mod error;
mod vcs;

pub use cli::GitCli;
pub use error::{Error, Result};
pub use vcs::{CommitSummary, Vcs};
