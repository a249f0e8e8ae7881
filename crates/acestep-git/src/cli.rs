//! `git` command-line implementation of [`Vcs`]

use crate::error::{Error, Result};
use crate::vcs::{CommitSummary, Vcs};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs the `git` binary against a working directory
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: Utf8PathBuf,
    program: String,
    proxy: Option<String>,
}

impl GitCli {
    /// Create a client operating in `workdir`
    pub fn new(workdir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            program: "git".to_string(),
            proxy: None,
        }
    }

    /// Use a different git executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Directory commands run in
    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }

    /// Proxy currently applied to network operations
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Show differences between two files outside of version control
    ///
    /// Returns `None` when the files are identical.
    pub async fn diff_no_index(&self, old: &Utf8Path, new: &Utf8Path) -> Result<Option<String>> {
        let args = [
            "diff",
            "--no-index",
            "--no-color",
            "--",
            old.as_str(),
            new.as_str(),
        ];
        let output = self.output(&args).await?;

        // --no-index exits 1 when the files differ
        match output.status.code() {
            Some(0) => Ok(None),
            Some(1) => Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned())),
            _ => Err(failure(&args, &output)),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.workdir)
            .args(["-c", "core.quotepath=false"]);

        if let Some(proxy) = &self.proxy {
            cmd.arg("-c")
                .arg(format!("http.proxy={}", proxy))
                .arg("-c")
                .arg(format!("https.proxy={}", proxy));
        }

        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        if !self.workdir.is_dir() {
            return Err(Error::not_a_repository(self.workdir.as_str()));
        }
        debug!("Running: git {}", args.join(" "));
        self.command(args).output().await.map_err(spawn_error)
    }

    async fn run_paths(&self, args: &[&str]) -> Result<Vec<String>> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(nul_separated(&output.stdout))
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

fn spawn_error(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::GitNotFound
    } else {
        Error::Io(e)
    }
}

fn failure(args: &[&str], output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr);
    Error::git_operation(format!(
        "git {} failed: {}",
        args.first().copied().unwrap_or_default(),
        stderr.trim()
    ))
}

/// Split `-z` output; paths are taken verbatim, without C-style quoting
fn nul_separated(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|b| *b == 0)
        .filter(|p| !p.is_empty())
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .collect()
}

#[async_trait]
impl Vcs for GitCli {
    async fn ensure_available(&self) -> Result<()> {
        which::which(&self.program).map_err(|_| Error::GitNotFound)?;

        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|_| Error::GitNotFound)?;

        if !output.status.success() {
            return Err(Error::GitNotFound);
        }

        debug!(
            "Using {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }

    async fn toplevel(&self) -> Result<Utf8PathBuf> {
        let output = self.output(&["rev-parse", "--show-toplevel"]).await?;
        if !output.status.success() {
            return Err(Error::not_a_repository(self.workdir.as_str()));
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Utf8PathBuf::from(root))
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        // exits 1 on a detached HEAD
        let output = self
            .output(&["symbolic-ref", "--quiet", "--short", "HEAD"])
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(branch).filter(|b| !b.is_empty()))
    }

    async fn short_hash(&self, rev: &str) -> Result<Option<String>> {
        let spec = format!("{}^{{commit}}", rev);
        let output = self
            .output(&["rev-parse", "--short", "--verify", "--quiet", &spec])
            .await?;
        if !output.status.success() {
            debug!("Revision '{}' does not resolve", rev);
            return Ok(None);
        }
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(hash).filter(|h| !h.is_empty()))
    }

    async fn fetch(&self, remote: &str, timeout: Duration) -> Result<()> {
        info!("Fetching from remote: {}", remote);

        if !self.workdir.is_dir() {
            return Err(Error::not_a_repository(self.workdir.as_str()));
        }

        let args = ["fetch", "--quiet", remote];
        let mut cmd = self.command(&args);
        cmd.kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(result) => result.map_err(spawn_error)?,
            Err(_) => {
                warn!("Fetch from '{}' timed out after {:?}", remote, timeout);
                return Err(Error::timeout("fetch", timeout.as_secs()));
            }
        };

        if !output.status.success() {
            return Err(failure(&args, &output));
        }

        info!("Fetch from '{}' completed successfully", remote);
        Ok(())
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let args = ["merge-base", "--is-ancestor", ancestor, descendant];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(failure(&args, &output)),
        }
    }

    async fn changed_files(&self, from: &str, to: &str) -> Result<Vec<String>> {
        self.run_paths(&["diff", "--name-only", "-z", from, to])
            .await
    }

    async fn modified_files(&self) -> Result<Vec<String>> {
        self.run_paths(&["diff", "--name-only", "-z", "HEAD"]).await
    }

    async fn deleted_files(&self) -> Result<Vec<String>> {
        self.run_paths(&["diff", "--name-only", "-z", "--diff-filter=D", "HEAD"])
            .await
    }

    async fn log(&self, from: &str, to: &str) -> Result<Vec<CommitSummary>> {
        let range = format!("{}..{}", from, to);
        let stdout = self
            .run(&["log", "--no-color", "--format=%h%x09%s", &range])
            .await?;

        Ok(stdout
            .lines()
            .filter_map(|line| {
                let (hash, subject) = line.split_once('\t')?;
                Some(CommitSummary {
                    hash: hash.to_string(),
                    subject: subject.to_string(),
                })
            })
            .collect())
    }

    async fn stash_push(&self, message: &str) -> Result<()> {
        info!("Stashing local changes: {}", message);
        self.run(&["stash", "push", "-m", message]).await?;
        Ok(())
    }

    async fn reset_hard(&self) -> Result<()> {
        warn!("Discarding local changes (reset --hard HEAD)");
        self.run(&["reset", "--hard", "HEAD"]).await?;
        Ok(())
    }

    async fn fast_forward(&self, remote: &str, branch: &str) -> Result<()> {
        // merges the ref fetched earlier, so no network access here
        let target = format!("{}/{}", remote, branch);
        info!("Fast-forwarding to {}", target);
        self.run(&["merge", "--ff-only", "--quiet", &target]).await?;
        Ok(())
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        info!("Checking out branch: {}", branch);
        self.run(&["checkout", "--quiet", branch]).await?;
        Ok(())
    }

    fn configure_proxy(&mut self, proxy: Option<&str>) {
        match proxy {
            Some(url) => debug!("Routing git network operations through {}", url),
            None => debug!("Git network operations use a direct connection"),
        }
        self.proxy = proxy.map(String::from);
    }
}
