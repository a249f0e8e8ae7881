//! Types shared across the updater crates

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of the local checkout relative to its remote
///
/// Read fresh on each invocation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    /// Branch the checkout is on (or the default branch when detached)
    pub current_branch: String,

    /// Short hash of the local HEAD
    pub local_commit: String,

    /// Short hash of `<remote>/<branch>`, once resolved
    pub remote_commit: Option<String>,
}

impl RepositoryState {
    /// Create a state with no remote commit resolved yet
    pub fn new(current_branch: impl Into<String>, local_commit: impl Into<String>) -> Self {
        Self {
            current_branch: current_branch.into(),
            local_commit: local_commit.into(),
            remote_commit: None,
        }
    }
}

/// Proxy settings applied to the version-control client before network access
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Whether the proxy should be used
    pub enabled: bool,

    /// Proxy URL, e.g. `http://127.0.0.1:7890`
    pub url: Option<String>,
}

impl ProxyConfig {
    /// A disabled proxy configuration
    pub fn disabled() -> Self {
        Self::default()
    }

    /// An enabled proxy configuration, validating the URL shape
    pub fn enabled_with(url: impl Into<String>) -> Result<Self> {
        let url = url.into().trim().to_string();
        if !is_valid_proxy_url(&url) {
            return Err(Error::invalid_proxy_url(url));
        }
        Ok(Self {
            enabled: true,
            url: Some(url),
        })
    }

    /// The URL to apply, if the proxy is enabled and has one
    pub fn effective_url(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

fn is_valid_proxy_url(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+')
                && !rest.is_empty()
                && !rest.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Updater configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct UpdaterConfig {
    /// Remote to compare against
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch used when the checkout is detached or its branch is missing remotely
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Upper bound on a single fetch, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Total fetch attempts, including retries after proxy reconfiguration
    #[serde(default = "default_max_fetch_attempts")]
    pub max_fetch_attempts: u32,

    /// Directory name prefix for conflict backups
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,

    /// Proxy file, relative to the repository root
    #[serde(default = "default_proxy_file")]
    pub proxy_file: String,
}

impl UpdaterConfig {
    /// Fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            default_branch: default_branch(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_fetch_attempts: default_max_fetch_attempts(),
            backup_prefix: default_backup_prefix(),
            proxy_file: default_proxy_file(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_fetch_timeout() -> u64 {
    10
}
fn default_max_fetch_attempts() -> u32 {
    3
}
fn default_backup_prefix() -> String {
    ".update_backup_".to_string()
}
fn default_proxy_file() -> String {
    "proxy_config.txt".to_string()
}
