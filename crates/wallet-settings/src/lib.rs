//! # Wallet Settings
//!
//! Per-network wallet settings record and the manager that reads and
//! persists it through a key-value store seam.
//!
//! Wallet-state events on the bus typically originate from changes to this
//! record (configuration completed, backup toggled, seed phrase verified),
//! but this crate does not depend on the bus: publishing is the calling
//! layer's job.

pub mod manager;
pub mod settings;
pub mod store;

// Re-export main types
pub use manager::WalletSettingsManager;
pub use settings::{WalletConfigurationState, WalletSettings};
pub use store::{InMemorySettingsStore, SettingsError, SettingsStore};
