//! Styled console lines for the updater
//!
//! Results go to stdout; failures and cautions go to stderr so a wrapping
//! launcher script can capture them separately.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Step finished
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Fatal or network failure, on stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Something the user should look at before continuing, on stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Section title, e.g. "Incoming commits"
pub fn header(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

/// `label: value` under a section, label dimmed
pub fn kv(label: &str, value: &str) {
    println!("  {}: {}", style(label).dim(), value);
}

/// Bullet under a section (a file, a command to run)
pub fn item(text: &str) {
    println!("    {} {}", style("-").dim(), text);
}

/// Incoming commit as `<hash> <subject>`, hash highlighted
pub fn commit(hash: &str, subject: &str) {
    println!("    {} {}", style(hash).yellow(), subject);
}

/// Ticking spinner for fetch and fast-forward; finish or clear it when the
/// phase ends
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(template.tick_chars(SPINNER_TICKS));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
