//! # Wallet Comms
//!
//! The engine configuration collaborator: builds an opaque configuration
//! handle from transport and database parameters, and guarantees the handle
//! is released on every exit path.
//!
//! The engine itself sits behind the [`CommsBackend`] seam; the application
//! layer implements it over the native wallet engine, tests implement it
//! in-process.

pub mod backend;
pub mod config;

// Re-export main types
pub use backend::{CommsBackend, RawConfigHandle};
pub use config::{CommsConfig, CommsSettings, ConfigError};
