//! In-memory version-control client
//!
//! Scripted with a builder, records every call, and applies fast-forwards
//! and checkouts to its own state so the coordinator sees consistent results.

use acestep_git::{CommitSummary, Error, Result, Vcs};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// How a scripted fetch attempt fails
#[derive(Debug, Clone)]
pub enum FetchFailure {
    Timeout,
    Refused(String),
}

#[derive(Debug, Default)]
struct FakeState {
    available: bool,
    toplevel: Option<Utf8PathBuf>,
    branch: Option<String>,
    head: String,
    local_branches: HashMap<String, String>,
    refs: HashMap<String, String>,
    ancestors: HashSet<(String, String)>,
    modified: Vec<String>,
    deleted: Vec<String>,
    changed: Vec<String>,
    incoming: Vec<CommitSummary>,
    fetch_failures: VecDeque<FetchFailure>,
    pull_error: Option<String>,
    proxy: Option<String>,
    calls: Vec<String>,
}

/// Fake [`Vcs`] for coordinator tests
#[derive(Debug)]
pub struct FakeVcs {
    state: Mutex<FakeState>,
}

impl FakeVcs {
    /// Checkout on `branch` at `head`
    pub fn new(branch: &str, head: &str) -> Self {
        let mut local_branches = HashMap::new();
        local_branches.insert(branch.to_string(), head.to_string());
        Self {
            state: Mutex::new(FakeState {
                available: true,
                toplevel: None,
                branch: Some(branch.to_string()),
                head: head.to_string(),
                local_branches,
                ..Default::default()
            }),
        }
    }

    fn with(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    /// Pretend git is not installed
    pub fn unavailable(self) -> Self {
        self.with(|s| s.available = false)
    }

    /// Report `path` as the repository root
    pub fn toplevel(self, path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        self.with(|s| s.toplevel = Some(path))
    }

    /// Detach HEAD
    pub fn detached(self) -> Self {
        self.with(|s| s.branch = None)
    }

    /// Add a local branch that checkout can switch to
    pub fn local_branch(self, name: &str, head: &str) -> Self {
        self.with(|s| {
            s.local_branches.insert(name.to_string(), head.to_string());
        })
    }

    /// Set the hash a remote-tracking ref resolves to, e.g. `origin/main`
    pub fn remote_ref(self, name: &str, hash: &str) -> Self {
        self.with(|s| {
            s.refs.insert(name.to_string(), hash.to_string());
        })
    }

    /// Record that `ancestor` is an ancestor of `descendant`
    pub fn ancestor(self, ancestor: &str, descendant: &str) -> Self {
        self.with(|s| {
            s.ancestors
                .insert((ancestor.to_string(), descendant.to_string()));
        })
    }

    /// Uncommitted local edits
    pub fn modified(self, files: &[&str]) -> Self {
        self.with(|s| s.modified = files.iter().map(|f| f.to_string()).collect())
    }

    /// Uncommitted local deletions (also listed as modified)
    pub fn deleted(self, files: &[&str]) -> Self {
        self.with(|s| s.deleted = files.iter().map(|f| f.to_string()).collect())
    }

    /// Files the remote changes relative to HEAD
    pub fn changed(self, files: &[&str]) -> Self {
        self.with(|s| s.changed = files.iter().map(|f| f.to_string()).collect())
    }

    /// Commits the remote has that HEAD lacks
    pub fn incoming(self, commits: &[(&str, &str)]) -> Self {
        self.with(|s| {
            s.incoming = commits
                .iter()
                .map(|(hash, subject)| CommitSummary {
                    hash: hash.to_string(),
                    subject: subject.to_string(),
                })
                .collect()
        })
    }

    /// Fail the next fetch attempt
    pub fn fetch_fails(self, failure: FetchFailure) -> Self {
        self.with(|s| s.fetch_failures.push_back(failure))
    }

    /// Fail every fast-forward with `message`
    pub fn pull_fails(self, message: &str) -> Self {
        let message = message.to_string();
        self.with(|s| s.pull_error = Some(message))
    }

    /// Every call made, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change the working tree or index
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                c.starts_with("stash")
                    || c.starts_with("reset")
                    || c.starts_with("fast_forward")
                    || c.starts_with("checkout")
            })
            .collect()
    }

    /// Number of fetch attempts
    pub fn fetch_count(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("fetch")).count()
    }

    /// Proxy currently applied
    pub fn proxy(&self) -> Option<String> {
        self.state.lock().unwrap().proxy.clone()
    }

    /// Current HEAD hash
    pub fn head(&self) -> String {
        self.state.lock().unwrap().head.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Vcs for FakeVcs {
    async fn ensure_available(&self) -> Result<()> {
        self.record("ensure_available".to_string());
        if self.state.lock().unwrap().available {
            Ok(())
        } else {
            Err(Error::GitNotFound)
        }
    }

    async fn toplevel(&self) -> Result<Utf8PathBuf> {
        self.record("toplevel".to_string());
        self.state
            .lock()
            .unwrap()
            .toplevel
            .clone()
            .ok_or_else(|| Error::not_a_repository("/nowhere"))
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        self.record("current_branch".to_string());
        Ok(self.state.lock().unwrap().branch.clone())
    }

    async fn short_hash(&self, rev: &str) -> Result<Option<String>> {
        self.record(format!("short_hash {}", rev));
        let state = self.state.lock().unwrap();
        if rev == "HEAD" {
            return Ok(Some(state.head.clone()));
        }
        Ok(state.refs.get(rev).cloned())
    }

    async fn fetch(&self, remote: &str, timeout: Duration) -> Result<()> {
        self.record(format!("fetch {}", remote));
        match self.state.lock().unwrap().fetch_failures.pop_front() {
            None => Ok(()),
            Some(FetchFailure::Timeout) => Err(Error::timeout(
                format!("fetch {}", remote),
                timeout.as_secs(),
            )),
            Some(FetchFailure::Refused(message)) => Err(Error::git_operation(message)),
        }
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        self.record(format!("is_ancestor {} {}", ancestor, descendant));
        Ok(self
            .state
            .lock()
            .unwrap()
            .ancestors
            .contains(&(ancestor.to_string(), descendant.to_string())))
    }

    async fn changed_files(&self, from: &str, to: &str) -> Result<Vec<String>> {
        self.record(format!("changed_files {} {}", from, to));
        Ok(self.state.lock().unwrap().changed.clone())
    }

    async fn modified_files(&self) -> Result<Vec<String>> {
        self.record("modified_files".to_string());
        Ok(self.state.lock().unwrap().modified.clone())
    }

    async fn deleted_files(&self) -> Result<Vec<String>> {
        self.record("deleted_files".to_string());
        Ok(self.state.lock().unwrap().deleted.clone())
    }

    async fn log(&self, from: &str, to: &str) -> Result<Vec<CommitSummary>> {
        self.record(format!("log {} {}", from, to));
        Ok(self.state.lock().unwrap().incoming.clone())
    }

    async fn stash_push(&self, message: &str) -> Result<()> {
        self.record(format!("stash_push {}", message));
        let mut state = self.state.lock().unwrap();
        state.modified.clear();
        state.deleted.clear();
        Ok(())
    }

    async fn reset_hard(&self) -> Result<()> {
        self.record("reset_hard".to_string());
        let mut state = self.state.lock().unwrap();
        state.modified.clear();
        state.deleted.clear();
        Ok(())
    }

    async fn fast_forward(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("fast_forward {} {}", remote, branch));
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.pull_error {
            return Err(Error::git_operation(message.clone()));
        }
        let target = format!("{}/{}", remote, branch);
        match state.refs.get(&target).cloned() {
            Some(hash) => {
                state.head = hash.clone();
                state.local_branches.insert(branch.to_string(), hash);
                Ok(())
            }
            None => Err(Error::git_operation(format!("couldn't find remote ref {}", branch))),
        }
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {}", branch));
        let mut state = self.state.lock().unwrap();
        match state.local_branches.get(branch).cloned() {
            Some(head) => {
                state.branch = Some(branch.to_string());
                state.head = head;
                Ok(())
            }
            None => Err(Error::git_operation(format!(
                "pathspec '{}' did not match any file(s) known to git",
                branch
            ))),
        }
    }

    fn configure_proxy(&mut self, proxy: Option<&str>) {
        let state = self.state.get_mut().unwrap();
        state.proxy = proxy.map(str::to_string);
        state.calls.push(format!("configure_proxy {:?}", proxy));
    }
}
