//! Layered updater configuration loader
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Checkout config (`<root>/.acestep/updater.yaml`)
//! 3. Environment variables (`ACESTEP_UPDATE_*` prefix)

use crate::error::{Error, Result};
use crate::types::UpdaterConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "updater-defaults.yaml";

/// Per-checkout config file, relative to the repository root
pub const CHECKOUT_CONFIG_PATH: &str = ".acestep/updater.yaml";

/// Overlay read from the checkout config; absent keys keep the lower layer's value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct UpdaterConfigOverlay {
    remote: Option<String>,
    default_branch: Option<String>,
    fetch_timeout_secs: Option<u64>,
    max_fetch_attempts: Option<u32>,
    backup_prefix: Option<String>,
    proxy_file: Option<String>,
}

/// Configuration loader rooted at a repository checkout
pub struct UpdaterConfigLoader {
    root: Utf8PathBuf,
}

impl UpdaterConfigLoader {
    /// Create a loader for the checkout at `root`
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root this loader reads from
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Load the updater configuration with layered precedence
    pub fn load(&self) -> Result<UpdaterConfig> {
        let mut config = Self::load_embedded_defaults()?;

        let checkout_config = self.root.join(CHECKOUT_CONFIG_PATH);
        if checkout_config.exists() {
            debug!("Loading checkout config from {}", checkout_config);
            let overlay = Self::load_overlay(&checkout_config)?;
            config = Self::merge(config, overlay);
        }

        config = Self::apply_env_overrides(config)?;
        Self::validate(&config)?;

        Ok(config)
    }

    fn load_embedded_defaults() -> Result<UpdaterConfig> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    fn load_overlay(path: &Utf8Path) -> Result<UpdaterConfigOverlay> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(UpdaterConfigOverlay::default());
        }
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    fn merge(mut base: UpdaterConfig, overlay: UpdaterConfigOverlay) -> UpdaterConfig {
        if let Some(remote) = overlay.remote {
            base.remote = remote;
        }
        if let Some(branch) = overlay.default_branch {
            base.default_branch = branch;
        }
        if let Some(secs) = overlay.fetch_timeout_secs {
            base.fetch_timeout_secs = secs;
        }
        if let Some(attempts) = overlay.max_fetch_attempts {
            base.max_fetch_attempts = attempts;
        }
        if let Some(prefix) = overlay.backup_prefix {
            base.backup_prefix = prefix;
        }
        if let Some(file) = overlay.proxy_file {
            base.proxy_file = file;
        }
        base
    }

    fn apply_env_overrides(mut config: UpdaterConfig) -> Result<UpdaterConfig> {
        if let Ok(val) = env::var("ACESTEP_UPDATE_REMOTE") {
            config.remote = val;
        }

        if let Ok(val) = env::var("ACESTEP_UPDATE_DEFAULT_BRANCH") {
            config.default_branch = val;
        }

        if let Ok(val) = env::var("ACESTEP_UPDATE_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("ACESTEP_UPDATE_FETCH_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("ACESTEP_UPDATE_MAX_FETCH_ATTEMPTS") {
            config.max_fetch_attempts = val.parse().map_err(|_| {
                Error::invalid_config("ACESTEP_UPDATE_MAX_FETCH_ATTEMPTS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("ACESTEP_UPDATE_PROXY_FILE") {
            config.proxy_file = val;
        }

        Ok(config)
    }

    fn validate(config: &UpdaterConfig) -> Result<()> {
        if config.remote.trim().is_empty() {
            return Err(Error::invalid_config("remote must not be empty"));
        }
        if config.default_branch.trim().is_empty() {
            return Err(Error::invalid_config("default-branch must not be empty"));
        }
        if config.fetch_timeout_secs == 0 {
            return Err(Error::invalid_config("fetch-timeout-secs must be at least 1"));
        }
        if config.max_fetch_attempts == 0 {
            return Err(Error::invalid_config("max-fetch-attempts must be at least 1"));
        }
        if config.backup_prefix.is_empty()
            || config.backup_prefix.contains('/')
            || config.backup_prefix.contains('\\')
        {
            return Err(Error::invalid_config(
                "backup-prefix must be a non-empty file name prefix",
            ));
        }
        Ok(())
    }
}
