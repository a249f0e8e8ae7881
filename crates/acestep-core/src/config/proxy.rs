//! Flat key=value proxy configuration store
//!
//! The file holds two recognized keys, matched case-insensitively:
//!
//! ```text
//! PROXY_ENABLED=1
//! PROXY_URL=http://127.0.0.1:7890
//! ```
//!
//! Blank lines, `#` comments and unknown keys are ignored on load. Saving
//! always writes the canonical two-line form above.

use crate::error::Result;
use crate::types::ProxyConfig;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::{debug, info, warn};

const KEY_ENABLED: &str = "proxy_enabled";
const KEY_URL: &str = "proxy_url";

/// Proxy configuration persisted next to the checkout
#[derive(Debug, Clone)]
pub struct ProxyStore {
    path: Utf8PathBuf,
}

impl ProxyStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load the persisted configuration
    ///
    /// A missing file is treated as a disabled proxy.
    pub fn load(&self) -> Result<ProxyConfig> {
        if !self.path.exists() {
            debug!("No proxy config at {}, proxy disabled", self.path);
            return Ok(ProxyConfig::disabled());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(parse(&content))
    }

    /// Persist `config` in canonical form
    pub fn save(&self, config: &ProxyConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, render(config))?;
        info!(
            "Proxy config saved to {} (enabled: {})",
            self.path, config.enabled
        );
        Ok(())
    }
}

/// Parse the key=value format
pub fn parse(content: &str) -> ProxyConfig {
    let mut config = ProxyConfig::disabled();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warn!("Ignoring malformed proxy config line {}: {}", line_no + 1, line);
            continue;
        };

        let value = value.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            KEY_ENABLED => config.enabled = matches!(value, "1" | "true" | "TRUE" | "True"),
            KEY_URL => {
                config.url = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            other => debug!("Ignoring unknown proxy config key: {}", other),
        }
    }

    config
}

/// Render the canonical two-line form
pub fn render(config: &ProxyConfig) -> String {
    format!(
        "PROXY_ENABLED={}\nPROXY_URL={}\n",
        if config.enabled { 1 } else { 0 },
        config.url.as_deref().unwrap_or("")
    )
}
