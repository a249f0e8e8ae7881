//! Update planning and conflict detection

use crate::error::Result;
use acestep_git::{CommitSummary, Vcs};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// What an update would change, computed before anything is touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Files differing between the working tree and HEAD
    pub local_modified_files: Vec<String>,

    /// Files differing between HEAD and the remote tip
    pub remote_changed_files: Vec<String>,

    /// Subset of the local edits that are deletions
    pub local_deleted_files: Vec<String>,

    /// Files in both sets above
    pub conflicts: Vec<String>,

    /// Commits the update brings in, newest first
    pub incoming_commits: Vec<CommitSummary>,
}

impl UpdatePlan {
    /// Build a plan from the two change sets
    pub fn new(
        local_modified_files: Vec<String>,
        remote_changed_files: Vec<String>,
        incoming_commits: Vec<CommitSummary>,
    ) -> Self {
        let conflicts = conflict_set(&local_modified_files, &remote_changed_files);
        Self {
            local_modified_files,
            remote_changed_files,
            local_deleted_files: Vec::new(),
            conflicts,
            incoming_commits,
        }
    }

    /// Record which local edits are deletions
    pub fn with_deleted(mut self, deleted: Vec<String>) -> Self {
        self.local_deleted_files = deleted;
        self
    }

    /// Whether any local edit would be overwritten by the update
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Whether the working tree has uncommitted edits
    pub fn has_local_changes(&self) -> bool {
        !self.local_modified_files.is_empty()
    }
}

/// Paths modified both locally and on the remote, sorted and deduplicated
pub fn conflict_set(local: &[String], remote: &[String]) -> Vec<String> {
    let local: BTreeSet<&str> = local.iter().map(String::as_str).collect();
    let remote: BTreeSet<&str> = remote.iter().map(String::as_str).collect();
    local
        .intersection(&remote)
        .map(|path| path.to_string())
        .collect()
}

/// Compute the plan for updating HEAD to `remote_ref`
pub async fn plan_update<V: Vcs + ?Sized>(vcs: &V, remote_ref: &str) -> Result<UpdatePlan> {
    let local = vcs.modified_files().await?;
    let remote = vcs.changed_files("HEAD", remote_ref).await?;
    let incoming = vcs.log("HEAD", remote_ref).await?;
    let deleted = if local.is_empty() {
        Vec::new()
    } else {
        vcs.deleted_files().await?
    };

    let plan = UpdatePlan::new(local, remote, incoming).with_deleted(deleted);
    debug!(
        "Local changes: {:?}, remote changes: {:?}",
        plan.local_modified_files, plan.remote_changed_files
    );
    info!(
        "{} incoming commit(s), {} local change(s), {} conflict(s)",
        plan.incoming_commits.len(),
        plan.local_modified_files.len(),
        plan.conflicts.len()
    );
    Ok(plan)
}
