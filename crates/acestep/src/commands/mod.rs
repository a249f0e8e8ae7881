//! CLI command implementations

pub mod backups;
pub mod check;
pub mod proxy;

use acestep_core::{UpdaterConfig, UpdaterConfigLoader};
use acestep_git::GitCli;
use acestep_update::{locate_repository, UpdateError};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use dialoguer::Confirm;
use tracing::debug;

/// Resolve the checkout root and load the updater configuration
pub(crate) async fn open_repository(repo: &Utf8Path) -> Result<(Utf8PathBuf, UpdaterConfig)> {
    let root = locate_repository(&GitCli::new(repo)).await?;
    let config = UpdaterConfigLoader::new(&root)
        .load()
        .map_err(UpdateError::from)
        .with_context(|| format!("Failed to load updater configuration for {}", root))?;
    debug!("Updater configuration: {:?}", config);
    Ok((root, config))
}

/// Ask a yes/no question unless `yes` already answered it
pub(crate) fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
