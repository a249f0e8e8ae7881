//! Timestamped backups of locally modified files
//!
//! A backup lives at `<root>/<prefix><YYYYMMDD_HHMMSS>/` (with a `_<n>` suffix
//! when several are taken in one second) and mirrors the relative path of
//! every file it holds. It is only created when local edits would be
//! overwritten by an update, and it stays until the user deletes it.

use crate::error::{Result, UpdateError};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Timestamp format used in backup directory names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const MAX_SAME_SECOND: u32 = 100;

/// A backup directory and the files it contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupManifest {
    /// Absolute path of the backup directory
    pub path: Utf8PathBuf,

    /// Directory name, e.g. `.update_backup_20250101_120000`
    pub name: String,

    /// When the backup was taken
    pub created: NaiveDateTime,

    /// Relative paths of the backed-up files, sorted
    pub files: Vec<String>,
}

impl BackupManifest {
    /// Copy `files` (relative to `root`) into a new backup directory
    ///
    /// Every file must exist in the working tree; local deletions have no
    /// content to preserve and must be left out by the caller. Nothing is
    /// left behind on failure.
    pub fn create(
        root: &Utf8Path,
        prefix: &str,
        files: &[String],
        at: DateTime<Local>,
    ) -> Result<Self> {
        let created = at.naive_local();
        let (name, path) = Self::reserve_dir(root, prefix, created)?;
        info!("Creating backup at {}", path);

        match Self::copy_files(root, &path, files) {
            Ok(copied) => {
                info!("Backed up {} file(s) to {}", copied.len(), path);
                Ok(Self {
                    path,
                    name,
                    created,
                    files: copied,
                })
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&path) {
                    warn!("Failed to remove incomplete backup {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Create a fresh, empty backup directory
    ///
    /// A second backup in the same second gets a `_<n>` suffix instead of
    /// reusing the first one's directory.
    fn reserve_dir(
        root: &Utf8Path,
        prefix: &str,
        created: NaiveDateTime,
    ) -> Result<(String, Utf8PathBuf)> {
        let stamp = created.format(TIMESTAMP_FORMAT).to_string();

        for n in 0..MAX_SAME_SECOND {
            let name = if n == 0 {
                format!("{}{}", prefix, stamp)
            } else {
                format!("{}{}_{}", prefix, stamp, n)
            };
            let path = root.join(&name);

            match fs::create_dir(&path) {
                Ok(()) => return Ok((name, path)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!("Backup directory {} already exists", path);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(UpdateError::invalid_backup(format!(
            "too many backups for {}{}",
            prefix, stamp
        )))
    }

    fn copy_files(root: &Utf8Path, path: &Utf8Path, files: &[String]) -> Result<Vec<String>> {
        let mut copied = Vec::with_capacity(files.len());
        for rel in files {
            let rel_path = validate_relative(rel)?;
            let source = root.join(rel_path);

            if !source.is_file() {
                return Err(UpdateError::invalid_backup(format!(
                    "cannot back up {}: not a file in the working tree",
                    rel
                )));
            }

            let dest = path.join(rel_path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(&source, &dest).map_err(|e| {
                UpdateError::invalid_backup(format!("failed to copy {} into backup: {}", rel, e))
            })?;
            debug!("Backed up {}", rel);
            copied.push(rel.clone());
        }

        copied.sort();
        Ok(copied)
    }

    /// Read an existing backup directory
    pub fn open(path: &Utf8Path, prefix: &str) -> Result<Self> {
        let name = path
            .file_name()
            .ok_or_else(|| UpdateError::invalid_backup(format!("{} has no name", path)))?
            .to_string();

        let created = parse_backup_name(&name, prefix).ok_or_else(|| {
            UpdateError::invalid_backup(format!("{} is not an update backup directory", name))
        })?;

        if !path.is_dir() {
            return Err(UpdateError::invalid_backup(format!(
                "backup {} does not exist",
                name
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path).min_depth(1) {
            let entry = entry.map_err(|e| UpdateError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let entry_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                UpdateError::invalid_backup(format!(
                    "non UTF-8 path in backup: {}",
                    entry.path().display()
                ))
            })?;
            if let Ok(rel) = entry_path.strip_prefix(path) {
                files.push(rel.as_str().replace('\\', "/"));
            }
        }
        files.sort();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            created,
            files,
        })
    }

    /// All backups under `root`, newest first
    pub fn list(root: &Utf8Path, prefix: &str) -> Result<Vec<Self>> {
        let mut backups = Vec::new();

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if parse_backup_name(&name, prefix).is_none() {
                continue;
            }
            backups.push(Self::open(&root.join(&name), prefix)?);
        }

        backups.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.name.cmp(&a.name)));
        Ok(backups)
    }

    /// Find a backup by directory name
    pub fn find(root: &Utf8Path, prefix: &str, name: &str) -> Result<Self> {
        // names only, never paths
        if name.contains('/') || name.contains('\\') {
            return Err(UpdateError::invalid_backup(format!(
                "{} is not a backup name",
                name
            )));
        }
        Self::open(&root.join(name), prefix)
    }

    /// Creation time in the local timezone
    pub fn created_local(&self) -> Option<DateTime<Local>> {
        Local.from_local_datetime(&self.created).earliest()
    }

    /// Whether the backup holds `rel`
    pub fn contains(&self, rel: &str) -> bool {
        self.files.iter().any(|f| f == rel)
    }

    /// Location of a backed-up file
    pub fn file_path(&self, rel: &str) -> Result<Utf8PathBuf> {
        let rel_path = validate_relative(rel)?;
        if !self.contains(rel_path.as_str()) {
            return Err(UpdateError::invalid_backup(format!(
                "{} is not in backup {}",
                rel, self.name
            )));
        }
        Ok(self.path.join(rel_path))
    }

    /// Copy a backed-up file over its working-tree counterpart
    pub fn restore_file(&self, root: &Utf8Path, rel: &str) -> Result<Utf8PathBuf> {
        let source = self.file_path(rel)?;
        let dest = root.join(validate_relative(rel)?);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &dest)?;

        info!("Restored {} from {}", rel, self.name);
        Ok(dest)
    }

    /// Remove the backup directory and everything in it
    pub fn delete(self) -> Result<()> {
        fs::remove_dir_all(&self.path)?;
        info!("Deleted backup {}", self.name);
        Ok(())
    }
}

/// Parse the timestamp out of a backup directory name
///
/// Accepts the `_<n>` suffix added to backups taken within the same second.
pub fn parse_backup_name(name: &str, prefix: &str) -> Option<NaiveDateTime> {
    let stamp = name.strip_prefix(prefix)?;
    if let Ok(created) = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) {
        return Some(created);
    }

    let (stamp, n) = stamp.rsplit_once('_')?;
    if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

fn validate_relative(rel: &str) -> Result<&Utf8Path> {
    let path = Utf8Path::new(rel);
    let normal = !rel.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Utf8Component::Normal(_)));

    if !normal {
        return Err(UpdateError::invalid_backup(format!(
            "{} is not a relative path inside the repository",
            rel
        )));
    }
    Ok(path)
}
