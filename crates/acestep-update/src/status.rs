//! Local versus remote commit comparison

use crate::error::Result;
use acestep_git::Vcs;
use std::fmt;
use tracing::debug;

/// How the local checkout relates to the remote branch tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    /// Same commit
    UpToDate,
    /// Local has commits the remote lacks; nothing to pull
    Ahead,
    /// Local HEAD is an ancestor of the remote tip; fast-forward possible
    Behind,
    /// Each side has commits the other lacks
    Diverged,
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UpToDate => "up to date",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
            Self::Diverged => "diverged",
        };
        f.write_str(label)
    }
}

/// Compare the local and remote commits
pub async fn compare_versions<V: Vcs + ?Sized>(
    vcs: &V,
    local: &str,
    remote: &str,
) -> Result<VersionStatus> {
    let status = if local == remote {
        VersionStatus::UpToDate
    } else if vcs.is_ancestor(local, remote).await? {
        VersionStatus::Behind
    } else if vcs.is_ancestor(remote, local).await? {
        VersionStatus::Ahead
    } else {
        VersionStatus::Diverged
    };

    debug!("Local {} vs remote {}: {}", local, remote, status);
    Ok(status)
}
