//! Physical models of the micro-grid: household loads, storage, and PV.

/// Controllable household loads and their priority classes.
pub mod appliance;
/// Home storage battery model.
pub mod battery;
/// Solar photovoltaic generation model.
pub mod solar;

// Re-export the main types for convenience
pub use appliance::{Device, Priority};
pub use battery::{Battery, BatteryState};
pub use solar::SolarArray;
