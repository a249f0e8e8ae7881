//! Version-control capability used by the update coordinator

use crate::error::Result;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::time::Duration;

/// One line of commit history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Short commit hash
    pub hash: String,
    /// First line of the commit message
    pub subject: String,
}

/// Operations the updater needs from a version-control client
///
/// Each operation is assumed atomic and independently invocable. The git CLI
/// implementation is [`crate::GitCli`]; tests substitute in-memory fakes.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Check the client is installed and runnable
    async fn ensure_available(&self) -> Result<()>;

    /// Root of the working tree containing the configured directory
    async fn toplevel(&self) -> Result<Utf8PathBuf>;

    /// Current branch name, `None` when HEAD is detached
    async fn current_branch(&self) -> Result<Option<String>>;

    /// Short hash for `rev`, `None` if it does not resolve to a commit
    async fn short_hash(&self, rev: &str) -> Result<Option<String>>;

    /// Fetch from `remote`, giving up after `timeout`
    async fn fetch(&self, remote: &str, timeout: Duration) -> Result<()>;

    /// Whether `ancestor` is reachable from `descendant`
    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    /// Paths that differ between two revisions
    async fn changed_files(&self, from: &str, to: &str) -> Result<Vec<String>>;

    /// Paths in the working tree that differ from HEAD
    async fn modified_files(&self) -> Result<Vec<String>>;

    /// Tracked paths deleted from the working tree
    async fn deleted_files(&self) -> Result<Vec<String>>;

    /// Commits reachable from `to` but not from `from`, newest first
    async fn log(&self, from: &str, to: &str) -> Result<Vec<CommitSummary>>;

    /// Shelve uncommitted changes
    async fn stash_push(&self, message: &str) -> Result<()>;

    /// Discard uncommitted changes to tracked files
    async fn reset_hard(&self) -> Result<()>;

    /// Fast-forward the current branch to the fetched `<remote>/<branch>`
    ///
    /// Uses only what the last fetch brought in; no network access.
    async fn fast_forward(&self, remote: &str, branch: &str) -> Result<()>;

    /// Switch the working tree to `branch`
    async fn checkout(&self, branch: &str) -> Result<()>;

    /// Route network operations through `proxy`, or directly when `None`
    fn configure_proxy(&mut self, proxy: Option<&str>);
}
