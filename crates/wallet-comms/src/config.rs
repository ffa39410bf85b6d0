//! Scoped configuration handle.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backend::{CommsBackend, RawConfigHandle};

/// Errors from configuration construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The engine returned no handle despite a zero error code.
    #[error("Engine returned no configuration handle")]
    InvalidConfiguration,
    /// The engine reported a numeric error code.
    #[error("Engine error code: {0}")]
    Generic(i32),
}

/// Parameters for constructing an engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommsSettings {
    /// Transport descriptor understood by the engine.
    pub transport: String,
    /// Folder holding the wallet database.
    pub database_folder_path: PathBuf,
    /// Database file name within the folder.
    pub database_name: String,
    /// Public address this wallet is reachable on.
    pub public_address: String,
    /// Peer discovery timeout, in seconds.
    pub discovery_timeout_secs: u64,
    /// How long store-and-forward messages live, in seconds.
    pub saf_message_duration_secs: u64,
    /// Network the wallet operates on.
    pub network_name: String,
}

/// An engine configuration handle with guaranteed release.
///
/// Construction either yields a live handle or a [`ConfigError`]; no
/// partially-constructed handle is ever retained, and `Drop` releases the
/// handle exactly once.
pub struct CommsConfig {
    backend: Arc<dyn CommsBackend>,
    handle: RawConfigHandle,
    database_folder_path: PathBuf,
    database_name: String,
}

impl CommsConfig {
    /// Construct a configuration through the engine backend.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Generic`] if the engine reports a non-zero code;
    /// [`ConfigError::InvalidConfiguration`] if it returns no handle.
    pub fn new(backend: Arc<dyn CommsBackend>, settings: CommsSettings) -> Result<Self, ConfigError> {
        let (code, handle) = backend.create_config(&settings);
        if code != 0 {
            return Err(ConfigError::Generic(code));
        }
        let Some(handle) = handle else {
            return Err(ConfigError::InvalidConfiguration);
        };

        debug!(
            network = %settings.network_name,
            database = %settings.database_name,
            "Engine configuration constructed"
        );

        Ok(Self {
            backend,
            handle,
            database_folder_path: settings.database_folder_path,
            database_name: settings.database_name,
        })
    }

    /// The raw handle, for passing back into engine calls.
    #[must_use]
    pub fn handle(&self) -> RawConfigHandle {
        self.handle
    }

    /// Folder holding the wallet database.
    #[must_use]
    pub fn database_folder_path(&self) -> &PathBuf {
        &self.database_folder_path
    }

    /// Database file name within the folder.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

impl Drop for CommsConfig {
    fn drop(&mut self) {
        self.backend.destroy_config(self.handle);
    }
}
