//! Error types for the update coordinator

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias using acestep-update's Error type
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Process exit code for success, no-op, informational stops and declined prompts
pub const EXIT_OK: u8 = 0;

/// Process exit code for fatal errors
pub const EXIT_FATAL: u8 = 1;

/// Process exit code for network fetch failures
///
/// Kept distinct so a launcher can continue starting up when only the update
/// check could not reach the remote.
pub const EXIT_NETWORK: u8 = 2;

/// Failures of an update attempt
///
/// Divergence, a local branch ahead of its remote and declined prompts are
/// outcomes rather than errors; see [`crate::UpdateOutcome`].
#[derive(Error, Debug)]
pub enum UpdateError {
    /// A required external tool is not installed
    #[error("Required tool not found: {tool}")]
    ToolMissing { tool: String },

    /// The directory is not inside a git checkout
    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    /// Fetch did not complete within the timeout
    #[error("Fetching from '{remote}' timed out after {secs}s")]
    NetworkTimeout { remote: String, secs: u64 },

    /// Fetch failed for any other reason
    #[error("Fetching from '{remote}' failed: {message}")]
    FetchFailed { remote: String, message: String },

    /// Neither the tracked branch nor the default branch exists on the remote
    #[error("Remote branch {remote}/{branch} not found, and fallback {remote}/{fallback} is missing too")]
    RemoteRefNotFound {
        remote: String,
        branch: String,
        fallback: String,
    },

    /// Pulling the update failed
    #[error("Update failed: {message}")]
    UpdateFailed {
        message: String,
        backup: Option<Utf8PathBuf>,
    },

    /// Backup directory or file could not be used
    #[error("Invalid backup: {message}")]
    InvalidBackup { message: String },

    /// Any other version-control failure
    #[error(transparent)]
    Git(acestep_git::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] acestep_core::Error),

    /// IO error, including failed terminal prompts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<acestep_git::Error> for UpdateError {
    fn from(err: acestep_git::Error) -> Self {
        match err {
            acestep_git::Error::GitNotFound => Self::ToolMissing {
                tool: "git".to_string(),
            },
            acestep_git::Error::NotARepository { path } => Self::NotARepository { path },
            other => Self::Git(other),
        }
    }
}

impl UpdateError {
    /// Create an update failed error
    pub fn update_failed(message: impl Into<String>, backup: Option<Utf8PathBuf>) -> Self {
        Self::UpdateFailed {
            message: message.into(),
            backup,
        }
    }

    /// Create an invalid backup error
    pub fn invalid_backup(message: impl Into<String>) -> Self {
        Self::InvalidBackup {
            message: message.into(),
        }
    }

    /// Map a fetch failure to its network error kind
    pub(crate) fn from_fetch(remote: &str, err: acestep_git::Error) -> Self {
        match err {
            acestep_git::Error::Timeout { secs, .. } => Self::NetworkTimeout {
                remote: remote.to_string(),
                secs,
            },
            acestep_git::Error::GitOperation { message } => Self::FetchFailed {
                remote: remote.to_string(),
                message,
            },
            other => other.into(),
        }
    }

    /// Whether this is a network failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkTimeout { .. } | Self::FetchFailed { .. })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_network() {
            EXIT_NETWORK
        } else {
            EXIT_FATAL
        }
    }

    /// What the user can do about it
    pub fn remediation(&self) -> Option<String> {
        match self {
            Self::ToolMissing { tool } => Some(format!(
                "Install {} and make sure it is on PATH, then run the updater again",
                tool
            )),
            Self::NotARepository { .. } => Some(
                "Run the updater from inside an ACE-Step git checkout (cloned with git clone)"
                    .to_string(),
            ),
            Self::NetworkTimeout { .. } | Self::FetchFailed { .. } => Some(
                "Check your network connection or configure a proxy with 'acestep-update proxy set <url>'"
                    .to_string(),
            ),
            Self::RemoteRefNotFound { remote, .. } => Some(format!(
                "Check the remote configuration with 'git remote -v' and 'git branch -r' ({})",
                remote
            )),
            Self::UpdateFailed {
                backup: Some(path), ..
            } => Some(format!(
                "Your modified files are preserved in {}. Resolve the problem and run the updater again",
                path
            )),
            Self::UpdateFailed { backup: None, .. } => {
                Some("Run 'git status' to inspect the checkout, then retry".to_string())
            }
            _ => None,
        }
    }
}
