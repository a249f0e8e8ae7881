//! # acestep-core
//!
//! Core library for the ACE-Step updater providing:
//! - Updater configuration (embedded defaults, per-checkout file, env overrides)
//! - The flat-file proxy configuration store
//! - Types shared between the git layer and the update coordinator

pub mod config;
pub mod error;
pub mod types;

pub use config::{ProxyStore, UpdaterConfigLoader};
pub use error::{Error, Result};
pub use types::{ProxyConfig, RepositoryState, UpdaterConfig};
