//! Cross-crate integration tests.

pub mod bus_properties;
