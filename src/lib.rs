//! Residential micro-grid simulator: solar, a home battery, controllable
//! loads, and automatic load shedding on low reserve.

/// REST API over the shared grid state.
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
/// Energy manager, power balance, shedding policy, and tick driver.
pub mod sim;
