//! Per-network settings record.

use serde::{Deserialize, Serialize};

/// How far the wallet on a given network has progressed through setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletConfigurationState {
    /// No wallet has been configured on this network.
    #[default]
    NotConfigured,
    /// A wallet database exists but onboarding is incomplete.
    Initialized,
    /// The user has authorized the wallet (biometrics/PIN).
    Authorized,
    /// Fully configured and usable.
    Ready,
}

/// Settings for one network identity.
///
/// Looked up by `network_name`; auto-created with defaults on first access
/// and persisted back on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSettings {
    /// The network these settings belong to.
    pub network_name: String,
    /// Setup progress for this network's wallet.
    pub configuration_state: WalletConfigurationState,
    /// Whether encrypted cloud backups are enabled.
    pub is_cloud_backup_enabled: bool,
    /// Whether the user has verified their seed phrase.
    pub has_verified_seed_phrase: bool,
}

impl WalletSettings {
    /// Default settings for a network seen for the first time.
    #[must_use]
    pub fn new(network_name: impl Into<String>) -> Self {
        Self {
            network_name: network_name.into(),
            configuration_state: WalletConfigurationState::NotConfigured,
            is_cloud_backup_enabled: false,
            has_verified_seed_phrase: false,
        }
    }
}
