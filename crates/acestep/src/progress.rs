//! Spinners for long-running update steps

use acestep_update::{UpdateError, UpdateObserver};
use indicatif::ProgressBar;
use std::sync::Mutex;

use crate::output;

/// Shows a spinner while fetching and pulling
#[derive(Debug, Default)]
pub struct SpinnerObserver {
    spinner: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&self, msg: &str) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(output::spinner(msg)) {
                previous.finish_and_clear();
            }
        }
    }

    fn stop(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl UpdateObserver for SpinnerObserver {
    fn on_fetch_start(&self, remote: &str, attempt: u32, max_attempts: u32) {
        if attempt > 1 {
            self.start(&format!(
                "Fetching from {} (attempt {}/{})...",
                remote, attempt, max_attempts
            ));
        } else {
            self.start(&format!("Fetching from {}...", remote));
        }
    }

    fn on_fetch_finished(&self, _attempt: u32, _error: Option<&UpdateError>) {
        self.stop();
    }

    fn on_pull_start(&self, remote_ref: &str) {
        self.start(&format!("Pulling {}...", remote_ref));
    }

    fn on_pull_finished(&self, _success: bool) {
        self.stop();
    }
}
