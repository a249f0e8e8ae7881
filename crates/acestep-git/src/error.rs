//! Error types for acestep-git

use thiserror::Error;

/// Result type alias using acestep-git's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Version-control client errors
#[derive(Error, Debug)]
pub enum Error {
    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// Working directory is not inside a git repository
    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    /// A bounded operation did not finish in time
    #[error("git {operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    /// Git operation failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not-a-repository error
    pub fn not_a_repository(path: impl Into<String>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            secs,
        }
    }

    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    /// Whether this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
