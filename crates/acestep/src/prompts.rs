//! Interactive answers for the update coordinator

use acestep_core::ProxyConfig;
use acestep_update::{Decision, Decisions};
use dialoguer::{Confirm, Input};
use std::io;

use crate::output;

/// Asks the user on the terminal
///
/// With `assume_yes` every confirmation is accepted without prompting and
/// proxy reconfiguration is skipped.
#[derive(Debug, Default)]
pub struct TerminalDecisions {
    assume_yes: bool,
}

impl TerminalDecisions {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Decisions for TerminalDecisions {
    fn confirm(&mut self, decision: &Decision<'_>) -> io::Result<bool> {
        let (prompt, default) = match decision {
            Decision::SwitchBranch { from, to } => {
                output::warning(&format!(
                    "Branch '{}' does not exist on the remote",
                    from
                ));
                (format!("Switch to branch '{}' and update it?", to), false)
            }
            Decision::ApplyUpdate { branch, incoming } => {
                output::header(&format!("{} new commit(s) on {}", incoming.len(), branch));
                for commit in incoming.iter() {
                    output::commit(&commit.hash, &commit.subject);
                }
                ("Apply the update now?".to_string(), true)
            }
            Decision::StashChanges { files } => {
                output::info("You have local changes that the update does not touch:");
                for file in files.iter() {
                    output::item(file);
                }
                (
                    "Stash them before updating? (restore later with 'git stash pop')".to_string(),
                    true,
                )
            }
            Decision::DiscardLocalChanges { conflicts, backup } => {
                output::warning("These files were changed both locally and upstream:");
                for file in conflicts.iter() {
                    output::item(file);
                }
                output::kv("Backup", backup.as_str());
                (
                    "Discard local changes and update? (copies stay in the backup)".to_string(),
                    false,
                )
            }
        };

        if self.assume_yes {
            return Ok(true);
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(io::Error::other)
    }

    fn reconfigure_proxy(
        &mut self,
        attempt: u32,
        max_attempts: u32,
        reason: &str,
        current: &ProxyConfig,
    ) -> io::Result<Option<ProxyConfig>> {
        output::warning(&format!(
            "Fetch attempt {}/{} failed: {}",
            attempt, max_attempts, reason
        ));
        if self.assume_yes {
            return Ok(None);
        }

        let retry = Confirm::new()
            .with_prompt("Configure a proxy and retry?")
            .default(false)
            .interact()
            .map_err(io::Error::other)?;
        if !retry {
            return Ok(None);
        }

        let url: String = Input::new()
            .with_prompt("Proxy URL (e.g. http://127.0.0.1:7890)")
            .with_initial_text(current.url.clone().unwrap_or_default())
            .validate_with(|input: &String| -> Result<(), String> {
                ProxyConfig::enabled_with(input.trim())
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(io::Error::other)?;

        ProxyConfig::enabled_with(url.trim())
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}
