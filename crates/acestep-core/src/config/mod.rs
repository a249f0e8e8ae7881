//! Configuration loading and persistence

mod loader;
pub mod proxy;

pub use loader::{UpdaterConfigLoader, CHECKOUT_CONFIG_PATH};
pub use proxy::ProxyStore;
