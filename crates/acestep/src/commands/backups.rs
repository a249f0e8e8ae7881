//! Backups command: inspect and clean up update backups

use acestep_git::GitCli;
use acestep_update::{BackupManifest, UpdateError};
use anyhow::Result;
use camino::Utf8Path;
use clap::Subcommand;

use super::confirm;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum BackupsCommands {
    /// List backups, newest first
    List,

    /// Show how backed-up files differ from the working tree
    Diff {
        /// Backup directory name
        backup: String,

        /// Only this file (relative to the repository root)
        file: Option<String>,
    },

    /// Copy a backed-up file over the working tree
    Restore {
        /// Backup directory name
        backup: String,

        /// File to restore (relative to the repository root)
        file: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup directory name
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        backup: Option<String>,

        /// Delete every backup
        #[arg(long)]
        all: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(cmd: BackupsCommands, repo: &Utf8Path) -> Result<()> {
    let (root, config) = super::open_repository(repo).await?;
    let prefix = config.backup_prefix.as_str();

    match cmd {
        BackupsCommands::List => list(&root, prefix),
        BackupsCommands::Diff { backup, file } => diff(&root, prefix, &backup, file).await,
        BackupsCommands::Restore { backup, file, yes } => {
            restore(&root, prefix, &backup, &file, yes)
        }
        BackupsCommands::Delete { backup, all, yes } => {
            if all {
                delete_all(&root, prefix, yes)
            } else if let Some(name) = backup {
                delete(&root, prefix, &name, yes)
            } else {
                Ok(())
            }
        }
    }
}

fn list(root: &Utf8Path, prefix: &str) -> Result<()> {
    let backups = BackupManifest::list(root, prefix)?;
    if backups.is_empty() {
        output::info("No backups found");
        return Ok(());
    }

    output::header(&format!("Backups in {}", root));
    for backup in &backups {
        output::kv(
            &backup.name,
            &format!(
                "{} ({} file(s))",
                backup.created.format("%Y-%m-%d %H:%M:%S"),
                backup.files.len()
            ),
        );
        for file in &backup.files {
            output::item(file);
        }
    }
    Ok(())
}

async fn diff(root: &Utf8Path, prefix: &str, name: &str, file: Option<String>) -> Result<()> {
    let backup = BackupManifest::find(root, prefix, name)?;
    let files = match file {
        Some(file) => vec![file],
        None => backup.files.clone(),
    };
    let git = GitCli::new(root);

    for rel in &files {
        let saved = backup.file_path(rel)?;
        let current = root.join(rel);

        if !current.is_file() {
            output::warning(&format!("{}: no longer present in the working tree", rel));
            continue;
        }

        match git.diff_no_index(&saved, &current).await.map_err(UpdateError::from)? {
            None => output::success(&format!("{}: identical to the backup", rel)),
            Some(text) => {
                output::header(rel);
                println!("{}", text);
            }
        }
    }
    Ok(())
}

fn restore(root: &Utf8Path, prefix: &str, name: &str, file: &str, yes: bool) -> Result<()> {
    let backup = BackupManifest::find(root, prefix, name)?;
    // fail on unknown files before asking
    backup.file_path(file)?;

    if !confirm(
        &format!("Overwrite {} with the copy from {}?", file, backup.name),
        yes,
    )? {
        output::info("Restore cancelled");
        return Ok(());
    }

    let dest = backup.restore_file(root, file)?;
    output::success(&format!("Restored {}", dest));
    Ok(())
}

fn delete(root: &Utf8Path, prefix: &str, name: &str, yes: bool) -> Result<()> {
    let backup = BackupManifest::find(root, prefix, name)?;

    if !confirm(
        &format!(
            "Delete backup {} ({} file(s))?",
            backup.name,
            backup.files.len()
        ),
        yes,
    )? {
        output::info("Delete cancelled");
        return Ok(());
    }

    let name = backup.name.clone();
    backup.delete()?;
    output::success(&format!("Deleted {}", name));
    Ok(())
}

fn delete_all(root: &Utf8Path, prefix: &str, yes: bool) -> Result<()> {
    let backups = BackupManifest::list(root, prefix)?;
    if backups.is_empty() {
        output::info("No backups found");
        return Ok(());
    }

    if !confirm(&format!("Delete all {} backup(s)?", backups.len()), yes)? {
        output::info("Delete cancelled");
        return Ok(());
    }

    let count = backups.len();
    for backup in backups {
        backup.delete()?;
    }
    output::success(&format!("Deleted {} backup(s)", count));
    Ok(())
}
