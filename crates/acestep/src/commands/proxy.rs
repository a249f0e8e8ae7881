//! Proxy command: show and edit the persisted fetch proxy

use acestep_core::{ProxyConfig, ProxyStore};
use acestep_update::UpdateError;
use anyhow::Result;
use camino::Utf8Path;
use clap::Subcommand;

use crate::output;

#[derive(Subcommand, Debug)]
pub enum ProxyCommands {
    /// Show the current proxy settings
    Show,

    /// Enable a proxy for fetching
    Set {
        /// Proxy URL, e.g. http://127.0.0.1:7890
        url: String,
    },

    /// Disable the proxy (the URL is kept)
    Disable,
}

pub async fn run(cmd: ProxyCommands, repo: &Utf8Path) -> Result<()> {
    let (root, config) = super::open_repository(repo).await?;
    let store = ProxyStore::new(root.join(&config.proxy_file));

    match cmd {
        ProxyCommands::Show => {
            let proxy = store.load().map_err(UpdateError::from)?;
            output::header("Proxy");
            output::kv("File", store.path().as_str());
            output::kv("Enabled", if proxy.enabled { "yes" } else { "no" });
            output::kv("URL", proxy.url.as_deref().unwrap_or("(none)"));
            if proxy.enabled && proxy.effective_url().is_none() {
                output::warning("Proxy is enabled but has no URL; it will not be applied");
            }
        }
        ProxyCommands::Set { url } => {
            let proxy = ProxyConfig::enabled_with(url.trim()).map_err(UpdateError::from)?;
            store.save(&proxy).map_err(UpdateError::from)?;
            output::success(&format!("Proxy set to {}", url.trim()));
        }
        ProxyCommands::Disable => {
            let current = store.load().map_err(UpdateError::from)?;
            let proxy = ProxyConfig {
                enabled: false,
                url: current.url,
            };
            store.save(&proxy).map_err(UpdateError::from)?;
            output::success("Proxy disabled");
        }
    }
    Ok(())
}
