//! Engine backend seam.

use crate::config::CommsSettings;

/// Opaque engine-side identifier for a constructed configuration.
pub type RawConfigHandle = u64;

/// The native-engine calls the configuration wrapper depends on.
///
/// `create_config` mirrors the engine call shape: a numeric error code
/// (zero on success) alongside an optional handle. Both failure modes occur
/// in practice and are surfaced as distinct [`ConfigError`] variants.
///
/// [`ConfigError`]: crate::config::ConfigError
pub trait CommsBackend: Send + Sync {
    /// Ask the engine to construct a configuration.
    fn create_config(&self, settings: &CommsSettings) -> (i32, Option<RawConfigHandle>);

    /// Release a handle previously returned by `create_config`.
    fn destroy_config(&self, handle: RawConfigHandle);
}
