//! Per-attempt update context and state machine

use acestep_core::{RepositoryState, UpdaterConfig};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use tracing::{debug, warn};

/// States of a single update attempt
///
/// ```text
/// Init -> VersionsCompared -> UpToDate | Ahead | Diverged
///                          -> BehindPlanned -> ConflictChecked
///                               -> NoConflict -> [Stashed] -> Pulled
///                               -> HasConflict -> BackedUp -> Confirmed -> Reset -> Pulled
/// ```
///
/// `Declined` can follow any state that waits on a user decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Init,
    VersionsCompared,
    UpToDate,
    Ahead,
    Diverged,
    BehindPlanned,
    ConflictChecked,
    NoConflict,
    Stashed,
    HasConflict,
    BackedUp,
    Confirmed,
    Reset,
    Pulled,
    Declined,
}

impl UpdatePhase {
    /// States reachable from this one
    pub fn successors(self) -> &'static [UpdatePhase] {
        use UpdatePhase::*;
        match self {
            Init => &[VersionsCompared, Declined],
            VersionsCompared => &[UpToDate, Ahead, Diverged, BehindPlanned],
            BehindPlanned => &[ConflictChecked],
            ConflictChecked => &[NoConflict, HasConflict, Declined],
            NoConflict => &[Stashed, Pulled, Declined],
            Stashed => &[Pulled],
            HasConflict => &[BackedUp],
            BackedUp => &[Confirmed, Declined],
            Confirmed => &[Reset],
            Reset => &[Pulled],
            UpToDate | Ahead | Diverged | Pulled | Declined => &[],
        }
    }

    /// Whether the attempt ends here
    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Context threaded through every step of one update attempt
#[derive(Debug, Clone)]
pub struct UpdateSession {
    root: Utf8PathBuf,
    remote: String,
    branch: String,
    state: Option<RepositoryState>,
    backup_dir: Option<Utf8PathBuf>,
    stashed: bool,
    phases: Vec<UpdatePhase>,
}

impl UpdateSession {
    /// Start a session for the checkout at `root`
    pub fn new(root: impl Into<Utf8PathBuf>, config: &UpdaterConfig) -> Self {
        Self {
            root: root.into(),
            remote: config.remote.clone(),
            branch: config.default_branch.clone(),
            state: None,
            backup_dir: None,
            stashed: false,
            phases: vec![UpdatePhase::Init],
        }
    }

    /// Repository root
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Remote being compared against
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Branch being updated
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// `<remote>/<branch>`
    pub fn remote_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    /// Detected repository state, once known
    pub fn state(&self) -> Option<&RepositoryState> {
        self.state.as_ref()
    }

    /// Backup created during this attempt
    pub fn backup_dir(&self) -> Option<&Utf8Path> {
        self.backup_dir.as_deref()
    }

    /// Whether local changes were stashed during this attempt
    pub fn stashed(&self) -> bool {
        self.stashed
    }

    /// Phases visited, in order
    pub fn phases(&self) -> &[UpdatePhase] {
        &self.phases
    }

    /// Current phase
    pub fn phase(&self) -> UpdatePhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(UpdatePhase::Init)
    }

    pub(crate) fn set_state(&mut self, state: RepositoryState) {
        self.branch = state.current_branch.clone();
        self.state = Some(state);
    }

    pub(crate) fn set_remote_commit(&mut self, hash: String) {
        if let Some(state) = self.state.as_mut() {
            state.remote_commit = Some(hash);
        }
    }

    pub(crate) fn set_backup_dir(&mut self, path: Utf8PathBuf) {
        self.backup_dir = Some(path);
    }

    pub(crate) fn mark_stashed(&mut self) {
        self.stashed = true;
    }

    /// Move to `next`, recording the transition
    pub(crate) fn advance(&mut self, next: UpdatePhase) {
        let current = self.phase();
        let allowed = current.successors().contains(&next);
        if !allowed {
            warn!("Unexpected update transition {} -> {}", current, next);
        }
        debug_assert!(allowed, "invalid transition {} -> {}", current, next);
        debug!("Update phase: {} -> {}", current, next);
        self.phases.push(next);
    }
}
