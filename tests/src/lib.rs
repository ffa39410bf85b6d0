//! # Mobile Wallet Core Test Suite
//!
//! Unified test crate containing:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── bus_properties.rs   # Delivery, teardown, ordering, isolation
//!     └── lifecycle.rs        # Screen lifecycle + collaborator wiring
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wallet-tests
//! cargo test -p wallet-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a subscriber once so failing tests show bus logs under
/// `RUST_LOG=wallet_bus=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
