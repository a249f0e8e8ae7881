//! Self-update coordination for ACE-Step checkouts
//!
//! This crate decides whether a local checkout is behind its remote branch,
//! detects local edits the update would overwrite, backs them up, and
//! fast-forwards the checkout once the user agrees.
//!
//! # Example
//!
//! ```no_run
//! use acestep_core::UpdaterConfigLoader;
//! use acestep_git::GitCli;
//! use acestep_update::{locate_repository, ScriptedDecisions, UpdateCoordinator};
//!
//! # async fn example() -> acestep_update::Result<()> {
//! let vcs = GitCli::new(".");
//! let root = locate_repository(&vcs).await?;
//! let config = UpdaterConfigLoader::new(&root).load()?;
//!
//! let mut coordinator =
//!     UpdateCoordinator::new(GitCli::new(&root), ScriptedDecisions::approve_all(), config, root);
//! let outcome = coordinator.run().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod backup;
mod coordinator;
mod decisions;
mod error;
mod observer;
mod outcome;
mod plan;
mod session;
mod status;

pub use backup::BackupManifest;
pub use coordinator::{locate_repository, RemoteCommit, UpdateCoordinator};
pub use decisions::{Decision, DecisionKind, Decisions, ScriptedDecisions};
pub use error::{Result, UpdateError, EXIT_FATAL, EXIT_NETWORK, EXIT_OK};
pub use observer::{NoOpObserver, UpdateObserver};
pub use outcome::UpdateOutcome;
pub use plan::{conflict_set, plan_update, UpdatePlan};
pub use session::{UpdatePhase, UpdateSession};
pub use status::{compare_versions, VersionStatus};
