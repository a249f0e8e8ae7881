//! Terminal results of an update attempt

use crate::backup::BackupManifest;
use crate::decisions::DecisionKind;
use camino::Utf8PathBuf;

/// How an update attempt ended without error
///
/// Every variant maps to exit code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Local and remote point at the same commit
    UpToDate { branch: String, commit: String },

    /// Local has unpublished commits and nothing to pull
    Ahead {
        branch: String,
        local: String,
        remote: String,
    },

    /// Histories diverged; needs manual resolution
    Diverged {
        branch: String,
        local: String,
        remote: String,
    },

    /// The user said no; the working tree was not modified
    Declined {
        decision: DecisionKind,
        backup: Option<Utf8PathBuf>,
    },

    /// The checkout was fast-forwarded
    Updated {
        branch: String,
        from: String,
        to: String,
        commits: usize,
        backup: Option<BackupManifest>,
        stashed: bool,
    },
}

impl UpdateOutcome {
    /// Whether the working tree changed
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Backup directory left for the user, if any
    pub fn backup_path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Declined { backup, .. } => backup.as_ref(),
            Self::Updated { backup, .. } => backup.as_ref().map(|b| &b.path),
            _ => None,
        }
    }
}
