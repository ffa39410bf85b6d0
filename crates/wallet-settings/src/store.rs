//! Key-value store seam for settings persistence.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::settings::WalletSettings;

/// Errors from the settings store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The underlying store failed to read or write.
    #[error("Settings storage failed: {0}")]
    Storage(String),
}

/// Persistence seam for per-network settings records.
///
/// Implemented over the platform key-value store in the application layer;
/// [`InMemorySettingsStore`] backs tests and previews.
pub trait SettingsStore: Send + Sync {
    /// Load the record for `network_name`, if one was ever saved.
    fn load(&self, network_name: &str) -> Result<Option<WalletSettings>, SettingsError>;

    /// Persist `settings` under its network identity, replacing any
    /// previous record.
    fn save(&self, settings: &WalletSettings) -> Result<(), SettingsError>;
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct InMemorySettingsStore {
    records: Mutex<HashMap<String, WalletSettings>>,
}

impl InMemorySettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self, network_name: &str) -> Result<Option<WalletSettings>, SettingsError> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(network_name).cloned())
    }

    fn save(&self, settings: &WalletSettings) -> Result<(), SettingsError> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(settings.network_name.clone(), settings.clone());
        Ok(())
    }
}
