//! TOML-based micro-grid configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::devices::{Battery, Device, Priority, SolarArray};
use crate::sim::clock::Clock;
use crate::sim::manager::EnergyManager;

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults matching the `house` preset. Load from TOML
/// with [`GridConfig::from_toml_file`] or use [`GridConfig::house`] for the
/// built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Tick cadence and policy thresholds.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Solar array parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Battery sizing.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// HTTP listener address.
    #[serde(default)]
    pub server: ServerConfig,
    /// Device inventory, in display order.
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceConfig>,
}

/// Tick cadence and policy thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Wall-clock time between ticks (ms, must be > 0).
    pub tick_interval_ms: u64,
    /// Charge percentage at or below which the battery stops supplying the
    /// house, and below which shedding kicks in.
    pub reserve_threshold_pct: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            reserve_threshold_pct: 20.0,
        }
    }
}

/// Solar array parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Output at solar noon (W).
    pub peak_w: f64,
    /// Length of one simulated day in wall-clock seconds.
    pub day_length_secs: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            peak_w: 3000.0,
            day_length_secs: 240.0,
        }
    }
}

/// Battery sizing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Stored energy at startup (kWh).
    pub initial_charge_kwh: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 10.0,
            initial_charge_kwh: 5.0,
        }
    }
}

/// HTTP listener address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// IP address to bind.
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// One entry of the device inventory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Identifier used in commands.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rated draw when on (W).
    pub power_w: f64,
    pub priority: Priority,
    /// Whether the device starts switched on.
    #[serde(default)]
    pub on: bool,
}

impl DeviceConfig {
    fn new(id: &str, name: &str, power_w: f64, priority: Priority, on: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            power_w,
            priority,
            on,
        }
    }

    fn build(&self) -> Device {
        let mut device = Device::new(&self.id, &self.name, self.power_w, self.priority);
        if self.on {
            device.turn_on();
        }
        device
    }
}

fn default_devices() -> Vec<DeviceConfig> {
    vec![
        DeviceConfig::new("luz_cozinha", "Kitchen Light", 60.0, Priority::Essential, false),
        DeviceConfig::new("geladeira", "Fridge", 150.0, Priority::Essential, true),
        DeviceConfig::new(
            "ar_condicionado",
            "Air Conditioner",
            1500.0,
            Priority::Low,
            false,
        ),
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl GridConfig {
    /// Returns the default single-house setup: 10 kWh battery at 50 %, a
    /// kitchen light, a fridge that starts on, and an air conditioner.
    pub fn house() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            solar: SolarConfig::default(),
            battery: BatteryConfig::default(),
            server: ServerConfig::default(),
            devices: default_devices(),
        }
    }

    /// Returns the low-reserve preset: battery at 15 % with the air
    /// conditioner running, so the first night tick sheds it.
    pub fn low_reserve() -> Self {
        let mut devices = default_devices();
        for d in &mut devices {
            if d.id == "ar_condicionado" {
                d.on = true;
            }
        }
        Self {
            battery: BatteryConfig {
                initial_charge_kwh: 1.5,
                ..BatteryConfig::default()
            },
            devices,
            ..Self::house()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["house", "low_reserve"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "house" => Ok(Self::house()),
            "low_reserve" => Ok(Self::low_reserve()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.tick_interval_ms == 0 {
            errors.push(ConfigError::new("simulation.tick_interval_ms", "must be > 0"));
        }
        if !(0.0..=100.0).contains(&s.reserve_threshold_pct) {
            errors.push(ConfigError::new(
                "simulation.reserve_threshold_pct",
                "must be in [0, 100]",
            ));
        }

        let sol = &self.solar;
        if sol.peak_w.is_nan() || sol.peak_w < 0.0 {
            errors.push(ConfigError::new("solar.peak_w", "must be >= 0"));
        }
        if sol.day_length_secs.is_nan() || sol.day_length_secs <= 0.0 {
            errors.push(ConfigError::new("solar.day_length_secs", "must be > 0"));
        }

        let bat = &self.battery;
        if bat.capacity_kwh.is_nan() || bat.capacity_kwh < 0.0 {
            errors.push(ConfigError::new("battery.capacity_kwh", "must be >= 0"));
        }
        if !(0.0..=bat.capacity_kwh).contains(&bat.initial_charge_kwh) {
            errors.push(ConfigError::new(
                "battery.initial_charge_kwh",
                "must be in [0, battery.capacity_kwh]",
            ));
        }

        if self.server.bind.parse::<IpAddr>().is_err() {
            errors.push(ConfigError::new(
                "server.bind",
                format!("\"{}\" is not an IP address", self.server.bind),
            ));
        }

        let mut seen = HashSet::new();
        for (i, d) in self.devices.iter().enumerate() {
            if d.id.is_empty() {
                errors.push(ConfigError::new(
                    format!("devices[{i}].id"),
                    "must not be empty",
                ));
            } else if !seen.insert(d.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("devices[{i}].id"),
                    format!("duplicate id \"{}\"", d.id),
                ));
            }
            if d.power_w.is_nan() || d.power_w < 0.0 {
                errors.push(ConfigError::new(
                    format!("devices[{i}].power_w"),
                    "must be >= 0",
                ));
            }
        }

        errors
    }

    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.simulation.tick_interval_ms)
    }

    /// Socket address for the HTTP listener.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `server.bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.bind.parse().map_err(|_| {
            ConfigError::new(
                "server.bind",
                format!("\"{}\" is not an IP address", self.server.bind),
            )
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Builds the energy manager described by this configuration.
    ///
    /// Call [`GridConfig::validate`] first; an invalid configuration is
    /// clamped into range by the device models rather than rejected here.
    ///
    /// # Panics
    ///
    /// Panics if `solar.day_length_secs` is not strictly positive.
    pub fn build(&self, clock: impl Clock + 'static) -> EnergyManager {
        let battery = Battery::new(self.battery.capacity_kwh, self.battery.initial_charge_kwh);
        let solar = SolarArray::new(self.solar.peak_w, self.solar.day_length_secs);
        let devices = self.devices.iter().map(DeviceConfig::build).collect();
        EnergyManager::new(battery, devices, solar, clock)
            .with_reserve_pct(self.simulation.reserve_threshold_pct)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::house()
    }
}
