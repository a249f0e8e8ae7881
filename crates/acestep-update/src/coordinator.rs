//! Update coordinator
//!
//! Drives one update attempt:
//! 1. Apply the persisted proxy to the version-control client
//! 2. Detect the current branch and commit
//! 3. Fetch the remote (bounded by a timeout, retried after proxy changes)
//! 4. Resolve the remote commit, falling back to the default branch
//! 5. Compare versions; stop unless the checkout is behind
//! 6. Plan the update and detect conflicting local edits
//! 7. Back up conflicts, stash or reset as the user decides, then fast-forward

use crate::backup::BackupManifest;
use crate::decisions::{Decision, DecisionKind, Decisions};
use crate::error::{Result, UpdateError};
use crate::observer::{NoOpObserver, UpdateObserver};
use crate::outcome::UpdateOutcome;
use crate::plan::{plan_update, UpdatePlan};
use crate::session::{UpdatePhase, UpdateSession};
use crate::status::{compare_versions, VersionStatus};
use acestep_core::{ProxyConfig, ProxyStore, RepositoryState, UpdaterConfig};
use acestep_git::Vcs;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use tracing::{debug, error, info, warn};

/// Check the client is installed and locate the repository root
pub async fn locate_repository<V: Vcs + ?Sized>(vcs: &V) -> Result<Utf8PathBuf> {
    vcs.ensure_available().await?;
    let root = vcs.toplevel().await?;
    debug!("Repository root: {}", root);
    Ok(root)
}

/// Where the remote commit was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommit {
    /// On the tracked branch
    Tracked(String),
    /// Only on the default branch
    Fallback { branch: String, hash: String },
}

/// Orchestrates version comparison, conflict backup and pull
pub struct UpdateCoordinator<V: Vcs, D: Decisions> {
    vcs: V,
    decisions: D,
    config: UpdaterConfig,
    root: Utf8PathBuf,
    observer: Box<dyn UpdateObserver>,
    session: Option<UpdateSession>,
}

impl<V: Vcs, D: Decisions> UpdateCoordinator<V, D> {
    /// Create a coordinator for the checkout at `root`
    pub fn new(vcs: V, decisions: D, config: UpdaterConfig, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            vcs,
            decisions,
            config,
            root: root.into(),
            observer: Box::new(NoOpObserver),
            session: None,
        }
    }

    /// Report progress to `observer`
    pub fn with_observer(mut self, observer: impl UpdateObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The version-control client
    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// The decision source
    pub fn decisions(&self) -> &D {
        &self.decisions
    }

    /// Effective configuration
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Repository root
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Session of the most recent attempt
    pub fn session(&self) -> Option<&UpdateSession> {
        self.session.as_ref()
    }

    /// Store holding the persisted proxy configuration
    pub fn proxy_store(&self) -> ProxyStore {
        ProxyStore::new(self.root.join(&self.config.proxy_file))
    }

    /// Run one update attempt to a terminal state
    pub async fn run(&mut self) -> Result<UpdateOutcome> {
        let mut session = UpdateSession::new(self.root.clone(), &self.config);
        let result = self.run_session(&mut session).await;

        match &result {
            Ok(outcome) => debug!("Update attempt finished: {:?}", outcome),
            Err(e) => debug!("Update attempt failed in {}: {}", session.phase(), e),
        }

        self.session = Some(session);
        result
    }

    async fn run_session(&mut self, session: &mut UpdateSession) -> Result<UpdateOutcome> {
        let proxy = self.load_proxy_config()?;

        let state = self.detect_current_state().await?;
        info!(
            "Current branch: {}, local commit: {}",
            state.current_branch, state.local_commit
        );
        session.set_state(state);

        self.fetch_remote(session, proxy).await?;

        let remote_commit = match self.resolve_remote_commit(session.branch()).await? {
            RemoteCommit::Tracked(hash) => hash,
            RemoteCommit::Fallback { branch, hash } => {
                let from = session.branch().to_string();
                let switch = Decision::SwitchBranch {
                    from: &from,
                    to: &branch,
                };
                if !self.decisions.confirm(&switch)? {
                    info!("Branch switch declined");
                    return Ok(self.declined(session, DecisionKind::SwitchBranch));
                }

                self.vcs.checkout(&branch).await?;
                let state = self.detect_current_state().await?;
                info!("Switched to branch {}", state.current_branch);
                session.set_state(state);
                hash
            }
        };
        session.set_remote_commit(remote_commit.clone());

        let local_commit = session
            .state()
            .map(|s| s.local_commit.clone())
            .unwrap_or_default();
        let status = compare_versions(&self.vcs, &local_commit, &remote_commit).await?;
        self.advance(session, UpdatePhase::VersionsCompared);

        let branch = session.branch().to_string();
        match status {
            VersionStatus::UpToDate => {
                self.advance(session, UpdatePhase::UpToDate);
                return Ok(UpdateOutcome::UpToDate {
                    branch,
                    commit: local_commit,
                });
            }
            VersionStatus::Ahead => {
                self.advance(session, UpdatePhase::Ahead);
                return Ok(UpdateOutcome::Ahead {
                    branch,
                    local: local_commit,
                    remote: remote_commit,
                });
            }
            VersionStatus::Diverged => {
                warn!(
                    "Local {} and remote {} have diverged; not updating",
                    local_commit, remote_commit
                );
                self.advance(session, UpdatePhase::Diverged);
                return Ok(UpdateOutcome::Diverged {
                    branch,
                    local: local_commit,
                    remote: remote_commit,
                });
            }
            VersionStatus::Behind => {}
        }

        let plan = plan_update(&self.vcs, &session.remote_ref()).await?;
        self.advance(session, UpdatePhase::BehindPlanned);
        self.advance(session, UpdatePhase::ConflictChecked);

        self.execute_update(session, &plan).await
    }

    /// Read the persisted proxy and apply it to the client
    pub fn load_proxy_config(&mut self) -> Result<ProxyConfig> {
        let store = self.proxy_store();
        let proxy = store.load()?;

        match proxy.effective_url() {
            Some(url) => info!("Using proxy {} from {}", url, store.path()),
            None => debug!("No proxy configured"),
        }
        self.vcs.configure_proxy(proxy.effective_url());
        Ok(proxy)
    }

    /// Query the current branch and local commit
    pub async fn detect_current_state(&self) -> Result<RepositoryState> {
        let branch = match self.vcs.current_branch().await? {
            Some(branch) => branch,
            None => {
                warn!(
                    "HEAD is detached; comparing against default branch {}",
                    self.config.default_branch
                );
                self.config.default_branch.clone()
            }
        };

        let local = self.vcs.short_hash("HEAD").await?.ok_or_else(|| {
            UpdateError::Git(acestep_git::Error::git_operation(
                "HEAD does not point to a commit",
            ))
        })?;

        Ok(RepositoryState::new(branch, local))
    }

    /// Fetch the remote, offering proxy reconfiguration between attempts
    pub async fn fetch_remote(
        &mut self,
        session: &UpdateSession,
        mut proxy: ProxyConfig,
    ) -> Result<()> {
        let remote = session.remote().to_string();
        let timeout = self.config.fetch_timeout();
        let max_attempts = self.config.max_fetch_attempts.max(1);
        let mut attempt = 1;

        loop {
            self.observer.on_fetch_start(&remote, attempt, max_attempts);

            let err = match self.vcs.fetch(&remote, timeout).await {
                Ok(()) => {
                    self.observer.on_fetch_finished(attempt, None);
                    return Ok(());
                }
                Err(e) => UpdateError::from_fetch(&remote, e),
            };
            self.observer.on_fetch_finished(attempt, Some(&err));

            if !err.is_network() {
                return Err(err);
            }
            warn!("Fetch attempt {}/{} failed: {}", attempt, max_attempts, err);

            if attempt >= max_attempts {
                error!("Giving up after {} fetch attempt(s)", attempt);
                return Err(err);
            }

            let reason = err.to_string();
            let Some(next) =
                self.decisions
                    .reconfigure_proxy(attempt, max_attempts, &reason, &proxy)?
            else {
                info!("Proxy retry declined");
                return Err(err);
            };

            self.proxy_store().save(&next)?;
            self.vcs.configure_proxy(next.effective_url());
            proxy = next;
            attempt += 1;
        }
    }

    /// Resolve `<remote>/<branch>`, falling back to the default branch
    pub async fn resolve_remote_commit(&self, branch: &str) -> Result<RemoteCommit> {
        let remote = &self.config.remote;

        if let Some(hash) = self.vcs.short_hash(&format!("{}/{}", remote, branch)).await? {
            return Ok(RemoteCommit::Tracked(hash));
        }

        let fallback = &self.config.default_branch;
        warn!("Remote branch {}/{} not found", remote, branch);

        if branch != fallback {
            if let Some(hash) = self
                .vcs
                .short_hash(&format!("{}/{}", remote, fallback))
                .await?
            {
                return Ok(RemoteCommit::Fallback {
                    branch: fallback.clone(),
                    hash,
                });
            }
        }

        Err(UpdateError::RemoteRefNotFound {
            remote: remote.clone(),
            branch: branch.to_string(),
            fallback: fallback.clone(),
        })
    }

    /// Apply a planned update
    pub async fn execute_update(
        &mut self,
        session: &mut UpdateSession,
        plan: &UpdatePlan,
    ) -> Result<UpdateOutcome> {
        let branch = session.branch().to_string();
        let apply = Decision::ApplyUpdate {
            branch: &branch,
            incoming: &plan.incoming_commits,
        };
        if !self.decisions.confirm(&apply)? {
            info!("Update declined");
            return Ok(self.declined(session, DecisionKind::ApplyUpdate));
        }

        let mut backup = None;

        if plan.has_conflicts() {
            self.advance(session, UpdatePhase::HasConflict);
            warn!("Conflicting local changes: {:?}", plan.conflicts);

            // reset --hard discards every local edit, so all of them are copied;
            // deletions have no content to keep
            let to_copy: Vec<String> = plan
                .local_modified_files
                .iter()
                .filter(|f| !plan.local_deleted_files.contains(f))
                .cloned()
                .collect();
            let manifest = BackupManifest::create(
                session.root(),
                &self.config.backup_prefix,
                &to_copy,
                Local::now(),
            )?;
            session.set_backup_dir(manifest.path.clone());
            self.advance(session, UpdatePhase::BackedUp);

            let discard = Decision::DiscardLocalChanges {
                conflicts: &plan.conflicts,
                backup: &manifest.path,
            };
            if !self.decisions.confirm(&discard)? {
                info!("Discarding local changes declined; backup kept at {}", manifest.path);
                return Ok(self.declined(session, DecisionKind::DiscardLocalChanges));
            }
            self.advance(session, UpdatePhase::Confirmed);

            self.vcs.reset_hard().await?;
            self.advance(session, UpdatePhase::Reset);
            backup = Some(manifest);
        } else {
            self.advance(session, UpdatePhase::NoConflict);

            if plan.has_local_changes() {
                let stash = Decision::StashChanges {
                    files: &plan.local_modified_files,
                };
                if !self.decisions.confirm(&stash)? {
                    info!("Stash declined");
                    return Ok(self.declined(session, DecisionKind::StashChanges));
                }

                let message = format!(
                    "acestep-update: local changes before update {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S")
                );
                self.vcs.stash_push(&message).await?;
                session.mark_stashed();
                self.advance(session, UpdatePhase::Stashed);
            }
        }

        self.pull(session).await?;

        let from = session
            .state()
            .map(|s| s.local_commit.clone())
            .unwrap_or_default();
        let to = self.vcs.short_hash("HEAD").await?.unwrap_or_default();
        info!("Updated {} from {} to {}", branch, from, to);

        Ok(UpdateOutcome::Updated {
            branch,
            from,
            to,
            commits: plan.incoming_commits.len(),
            backup,
            stashed: session.stashed(),
        })
    }

    async fn pull(&mut self, session: &mut UpdateSession) -> Result<()> {
        let remote_ref = session.remote_ref();
        self.observer.on_pull_start(&remote_ref);

        if let Err(e) = self
            .vcs
            .fast_forward(session.remote(), session.branch())
            .await
        {
            self.observer.on_pull_finished(false);
            error!("Pull from {} failed: {}", remote_ref, e);

            let mut message = e.to_string();
            if session.stashed() {
                message.push_str(
                    "; your local changes are in the stash (restore with 'git stash pop')",
                );
            }
            return Err(UpdateError::update_failed(
                message,
                session.backup_dir().map(Utf8Path::to_path_buf),
            ));
        }

        self.observer.on_pull_finished(true);
        self.advance(session, UpdatePhase::Pulled);
        Ok(())
    }

    fn declined(&self, session: &mut UpdateSession, decision: DecisionKind) -> UpdateOutcome {
        self.advance(session, UpdatePhase::Declined);
        UpdateOutcome::Declined {
            decision,
            backup: session.backup_dir().map(Utf8Path::to_path_buf),
        }
    }

    fn advance(&self, session: &mut UpdateSession, phase: UpdatePhase) {
        session.advance(phase);
        self.observer.on_phase(phase);
    }
}
