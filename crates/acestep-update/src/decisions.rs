//! User decisions guarding state transitions
//!
//! Every point where the update flow needs a human answer goes through
//! [`Decisions`]. The CLI answers with terminal prompts; tests and launchers
//! answer programmatically with [`ScriptedDecisions`].

use acestep_core::ProxyConfig;
use acestep_git::CommitSummary;
use camino::Utf8Path;
use std::collections::{HashMap, VecDeque};
use std::io;

/// A yes/no question asked during an update attempt
#[derive(Debug, Clone, Copy)]
pub enum Decision<'a> {
    /// The tracked branch is missing remotely; switch to the default branch?
    SwitchBranch { from: &'a str, to: &'a str },

    /// The checkout is behind; apply the incoming commits?
    ApplyUpdate {
        branch: &'a str,
        incoming: &'a [CommitSummary],
    },

    /// Local edits do not conflict; stash them before pulling?
    StashChanges { files: &'a [String] },

    /// Local edits conflict and were backed up; discard them and pull?
    DiscardLocalChanges {
        conflicts: &'a [String],
        backup: &'a Utf8Path,
    },
}

/// Kind of a [`Decision`], without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    SwitchBranch,
    ApplyUpdate,
    StashChanges,
    DiscardLocalChanges,
}

impl Decision<'_> {
    /// The kind of this decision
    pub fn kind(&self) -> DecisionKind {
        match self {
            Self::SwitchBranch { .. } => DecisionKind::SwitchBranch,
            Self::ApplyUpdate { .. } => DecisionKind::ApplyUpdate,
            Self::StashChanges { .. } => DecisionKind::StashChanges,
            Self::DiscardLocalChanges { .. } => DecisionKind::DiscardLocalChanges,
        }
    }
}

/// Supplies answers to the update flow
pub trait Decisions {
    /// Answer a yes/no decision
    fn confirm(&mut self, decision: &Decision<'_>) -> io::Result<bool>;

    /// After a failed fetch, return a proxy configuration to retry with,
    /// or `None` to stop retrying
    fn reconfigure_proxy(
        &mut self,
        attempt: u32,
        max_attempts: u32,
        reason: &str,
        current: &ProxyConfig,
    ) -> io::Result<Option<ProxyConfig>>;
}

/// Pre-recorded answers for non-interactive drivers
///
/// Unanswered decisions are declined, and proxy retries stop once the
/// recorded answers run out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    answers: HashMap<DecisionKind, bool>,
    proxy_answers: VecDeque<Option<ProxyConfig>>,
    asked: Vec<DecisionKind>,
    proxy_prompts: u32,
}

impl ScriptedDecisions {
    /// Decline everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Approve every yes/no decision
    pub fn approve_all() -> Self {
        Self::new()
            .answer(DecisionKind::SwitchBranch, true)
            .answer(DecisionKind::ApplyUpdate, true)
            .answer(DecisionKind::StashChanges, true)
            .answer(DecisionKind::DiscardLocalChanges, true)
    }

    /// Record the answer for a kind of decision
    pub fn answer(mut self, kind: DecisionKind, yes: bool) -> Self {
        self.answers.insert(kind, yes);
        self
    }

    /// Queue an answer for the next proxy reconfiguration prompt
    pub fn proxy_answer(mut self, answer: Option<ProxyConfig>) -> Self {
        self.proxy_answers.push_back(answer);
        self
    }

    /// Decisions asked so far, in order
    pub fn asked(&self) -> &[DecisionKind] {
        &self.asked
    }

    /// Number of proxy reconfiguration prompts so far
    pub fn proxy_prompts(&self) -> u32 {
        self.proxy_prompts
    }
}

impl Decisions for ScriptedDecisions {
    fn confirm(&mut self, decision: &Decision<'_>) -> io::Result<bool> {
        let kind = decision.kind();
        self.asked.push(kind);
        Ok(self.answers.get(&kind).copied().unwrap_or(false))
    }

    fn reconfigure_proxy(
        &mut self,
        _attempt: u32,
        _max_attempts: u32,
        _reason: &str,
        _current: &ProxyConfig,
    ) -> io::Result<Option<ProxyConfig>> {
        self.proxy_prompts += 1;
        Ok(self.proxy_answers.pop_front().flatten())
    }
}
