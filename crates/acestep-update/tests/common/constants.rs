//! Test constants

pub const LOCAL_COMMIT: &str = "abc123";
pub const REMOTE_COMMIT: &str = "def456";
pub const OTHER_COMMIT: &str = "fed789";

pub const BRANCH_MAIN: &str = "main";
pub const BRANCH_FEATURE: &str = "feature-x";
pub const REMOTE: &str = "origin";

pub const BACKUP_PREFIX: &str = ".update_backup_";
pub const CONFIG_FILE: &str = "config.yaml";
pub const APP_FILE: &str = "app.py";
pub const NOTES_FILE: &str = "notes.txt";

pub const PROXY_URL: &str = "http://127.0.0.1:7890";
