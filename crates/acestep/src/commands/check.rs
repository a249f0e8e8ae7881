//! Check command: compare with the remote and apply the update

use acestep_git::GitCli;
use acestep_update::{UpdateCoordinator, UpdateOutcome};
use anyhow::Result;
use camino::Utf8Path;

use crate::cli::CheckArgs;
use crate::output;
use crate::progress::SpinnerObserver;
use crate::prompts::TerminalDecisions;

pub async fn run(args: CheckArgs, repo: &Utf8Path) -> Result<()> {
    let (root, config) = super::open_repository(repo).await?;
    let remote = config.remote.clone();

    output::header("ACE-Step update check");
    output::kv("Repository", root.as_str());

    let mut coordinator = UpdateCoordinator::new(
        GitCli::new(root.clone()),
        TerminalDecisions::new(args.yes),
        config,
        root,
    )
    .with_observer(SpinnerObserver::new());

    let outcome = coordinator.run().await?;
    report(&outcome, &remote);
    Ok(())
}

fn report(outcome: &UpdateOutcome, remote: &str) {
    match outcome {
        UpdateOutcome::UpToDate { branch, commit } => {
            output::success(&format!("Already up to date ({} at {})", branch, commit));
        }
        UpdateOutcome::Ahead {
            branch,
            local,
            remote: remote_commit,
        } => {
            output::info(&format!(
                "Local {} ({}) has commits not on {}/{} ({}); nothing to update",
                branch, local, remote, branch, remote_commit
            ));
        }
        UpdateOutcome::Diverged {
            branch,
            local,
            remote: remote_commit,
        } => {
            output::warning(&format!(
                "Local {} ({}) and {}/{} ({}) have diverged",
                branch, local, remote, branch, remote_commit
            ));
            output::info("Resolve this manually, for example:");
            output::item("git status");
            output::item(&format!("git pull --rebase {} {}", remote, branch));
            output::item(&format!(
                "or 'git reset --hard {}/{}' to drop local commits",
                remote, branch
            ));
        }
        UpdateOutcome::Declined { backup, .. } => {
            output::info("Update cancelled; your checkout was not changed");
            if let Some(path) = backup {
                output::kv("Backup of your modified files", path.as_str());
            }
        }
        UpdateOutcome::Updated {
            branch,
            from,
            to,
            commits,
            backup,
            stashed,
        } => {
            output::success(&format!(
                "Updated {} from {} to {} ({} commit(s))",
                branch, from, to, commits
            ));
            if let Some(backup) = backup {
                output::kv("Backup", backup.path.as_str());
                output::info(&format!(
                    "Compare your old files with 'acestep-update backups diff {}'",
                    backup.name
                ));
            }
            if *stashed {
                output::info("Your local changes were stashed; restore them with 'git stash pop'");
            }
        }
    }
}
