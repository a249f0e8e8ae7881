//! Filesystem and git fixtures

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Write `content` to `rel` inside `dir`, creating parents
pub fn write_file(dir: &Utf8Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Backup directories directly under `root`
pub fn backup_dirs(root: &Utf8Path, prefix: &str) -> Vec<Utf8PathBuf> {
    let mut dirs: Vec<Utf8PathBuf> = fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
        .map(|e| Utf8PathBuf::from_path_buf(e.path()).unwrap())
        .collect();
    dirs.sort();
    dirs
}

/// Temporary checkout root with working-tree files
pub struct Workspace {
    _temp: TempDir,
    pub root: Utf8PathBuf,
}

impl Workspace {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        for (rel, content) in files {
            write_file(&root, rel, content);
        }
        Self { _temp: temp, root }
    }
}

/// Run git in `dir`, panicking with stderr on failure
pub fn git(dir: &Utf8Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Utf8Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Bare origin, a publisher clone that pushes, and the user's local clone
pub struct RemoteFixture {
    _temp: TempDir,
    pub origin: Utf8PathBuf,
    pub publisher: Utf8PathBuf,
    pub local: Utf8PathBuf,
}

impl RemoteFixture {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let origin = root.join("origin.git");
        let publisher = root.join("publisher");
        let local = root.join("local");

        git(
            &root,
            &["init", "--bare", "--initial-branch=main", origin.as_str()],
        );

        fs::create_dir_all(&publisher).unwrap();
        git(&publisher, &["init", "--initial-branch=main"]);
        configure_identity(&publisher);
        git(&publisher, &["remote", "add", "origin", origin.as_str()]);
        for (rel, content) in files {
            write_file(&publisher, rel, content);
        }
        git(&publisher, &["add", "-A"]);
        git(&publisher, &["commit", "-m", "initial commit"]);
        git(&publisher, &["push", "origin", "main"]);

        git(&root, &["clone", origin.as_str(), local.as_str()]);
        configure_identity(&local);

        Self {
            _temp: temp,
            origin,
            publisher,
            local,
        }
    }

    /// Commit `files` in the publisher and push; returns the short hash
    pub fn publish(&self, files: &[(&str, &str)], message: &str) -> String {
        for (rel, content) in files {
            write_file(&self.publisher, rel, content);
        }
        git(&self.publisher, &["add", "-A"]);
        git(&self.publisher, &["commit", "-m", message]);
        git(&self.publisher, &["push", "origin", "HEAD"]);
        git(&self.publisher, &["rev-parse", "--short", "HEAD"])
    }

    /// Commit `files` in the local checkout without pushing
    pub fn commit_local(&self, files: &[(&str, &str)], message: &str) -> String {
        for (rel, content) in files {
            write_file(&self.local, rel, content);
        }
        git(&self.local, &["add", "-A"]);
        git(&self.local, &["commit", "-m", message]);
        self.local_head()
    }

    pub fn local_head(&self) -> String {
        git(&self.local, &["rev-parse", "--short", "HEAD"])
    }
}
