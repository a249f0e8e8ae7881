//! Progress notifications from the update coordinator
//!
//! The coordinator reports long-running steps through [`UpdateObserver`] so a
//! front end can show spinners without the library knowing about terminals.

use crate::error::UpdateError;
use crate::session::UpdatePhase;

/// Observer for update progress events
///
/// All methods default to doing nothing.
pub trait UpdateObserver: Send + Sync {
    /// Called after every state transition
    fn on_phase(&self, phase: UpdatePhase) {
        let _ = phase;
    }

    /// Called before each fetch attempt (1-indexed)
    fn on_fetch_start(&self, remote: &str, attempt: u32, max_attempts: u32) {
        let _ = (remote, attempt, max_attempts);
    }

    /// Called when a fetch attempt completes, with its error if it failed
    fn on_fetch_finished(&self, attempt: u32, error: Option<&UpdateError>) {
        let _ = (attempt, error);
    }

    /// Called before pulling
    fn on_pull_start(&self, remote_ref: &str) {
        let _ = remote_ref;
    }

    /// Called when the pull completes
    fn on_pull_finished(&self, success: bool) {
        let _ = success;
    }
}

/// An observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl UpdateObserver for NoOpObserver {}
