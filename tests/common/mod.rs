//! Shared test fixtures for integration tests.

use microgrid_sim::config::GridConfig;
use microgrid_sim::sim::clock::FixedClock;
use microgrid_sim::sim::manager::EnergyManager;

/// Start of the simulated day: zero solar output.
pub const NIGHT: f64 = 0.0;

/// Solar noon of the default 240 s day: 3000 W.
pub const NOON: f64 = 120.0;

/// Energy in kWh delivered by `watts` over one 1 s tick.
pub fn one_second_kwh(watts: f64) -> f64 {
    watts / 3600.0 / 1000.0
}

/// Default house (10 kWh battery, kitchen light, fridge, AC) with the
/// given stored charge and the listed devices switched on.
///
/// The manager's clock is frozen at `NIGHT`, so forced ticks from
/// commands see no solar output.
pub fn house(charge_kwh: f64, on: &[&str]) -> EnergyManager {
    let mut config = GridConfig::house();
    config.battery.initial_charge_kwh = charge_kwh;
    for device in &mut config.devices {
        device.on = on.contains(&device.id.as_str());
    }
    config.build(FixedClock(NIGHT))
}
