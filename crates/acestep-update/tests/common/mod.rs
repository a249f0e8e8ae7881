//! Shared test utilities for acestep-update tests
//!
//! - `fake_vcs`: in-memory version-control client with call recording
//! - `fixtures`: real git repositories in temp directories
//! - `constants`: commit hashes and file names used across tests

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fake_vcs;
pub mod fixtures;

pub use constants::*;
pub use fake_vcs::*;
pub use fixtures::*;
