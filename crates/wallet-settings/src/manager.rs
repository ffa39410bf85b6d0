//! Settings manager: typed accessors over the store seam.

use tracing::debug;

use crate::settings::{WalletConfigurationState, WalletSettings};
use crate::store::{SettingsError, SettingsStore};

/// Reads and mutates the per-network settings record.
///
/// The record is auto-created with default values on first access and
/// persisted back on every mutation.
pub struct WalletSettingsManager<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> WalletSettingsManager<S> {
    /// Create a manager over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The full settings record for `network_name`, creating and persisting
    /// the default record if none exists yet.
    ///
    /// # Errors
    ///
    /// Propagates [`SettingsError`] from the store.
    pub fn settings(&self, network_name: &str) -> Result<WalletSettings, SettingsError> {
        if let Some(existing) = self.store.load(network_name)? {
            return Ok(existing);
        }
        let created = WalletSettings::new(network_name);
        self.store.save(&created)?;
        debug!(network = network_name, "Created default wallet settings");
        Ok(created)
    }

    /// Setup progress for `network_name`.
    pub fn configuration_state(
        &self,
        network_name: &str,
    ) -> Result<WalletConfigurationState, SettingsError> {
        Ok(self.settings(network_name)?.configuration_state)
    }

    /// Update setup progress, persisting immediately.
    pub fn set_configuration_state(
        &self,
        network_name: &str,
        state: WalletConfigurationState,
    ) -> Result<(), SettingsError> {
        let mut settings = self.settings(network_name)?;
        settings.configuration_state = state;
        self.store.save(&settings)
    }

    /// Whether encrypted cloud backups are enabled for `network_name`.
    pub fn is_cloud_backup_enabled(&self, network_name: &str) -> Result<bool, SettingsError> {
        Ok(self.settings(network_name)?.is_cloud_backup_enabled)
    }

    /// Toggle cloud backups, persisting immediately.
    pub fn set_cloud_backup_enabled(
        &self,
        network_name: &str,
        enabled: bool,
    ) -> Result<(), SettingsError> {
        let mut settings = self.settings(network_name)?;
        settings.is_cloud_backup_enabled = enabled;
        self.store.save(&settings)
    }

    /// Whether the user has verified their seed phrase on `network_name`.
    pub fn has_verified_seed_phrase(&self, network_name: &str) -> Result<bool, SettingsError> {
        Ok(self.settings(network_name)?.has_verified_seed_phrase)
    }

    /// Record seed-phrase verification, persisting immediately.
    pub fn set_seed_phrase_verified(
        &self,
        network_name: &str,
        verified: bool,
    ) -> Result<(), SettingsError> {
        let mut settings = self.settings(network_name)?;
        settings.has_verified_seed_phrase = verified;
        self.store.save(&settings)
    }
}
