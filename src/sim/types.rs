//! Core simulation types: commands, tick reports, and state snapshots.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::devices::{BatteryState, Device, Priority};

/// Errors surfaced by device commands. Neither variant mutates state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command names a device that is not in the inventory.
    #[error("device '{id}' not found")]
    DeviceNotFound { id: String },
    /// The action is neither `on` nor `off`.
    #[error("invalid action '{action}', expected \"on\" or \"off\"")]
    InvalidAction { action: String },
}

/// Switching action accepted by [`crate::sim::manager::EnergyManager::apply_command`].
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::types::Action;
///
/// assert_eq!("on".parse::<Action>(), Ok(Action::On));
/// assert!("toggle".parse::<Action>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(CommandError::InvalidAction {
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
        })
    }
}

/// Result of a successful device command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub id: String,
    pub name: String,
    /// Device state after the command and the forced tick that follows it.
    pub on: bool,
}

/// Figures computed by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick counter.
    pub tick: u64,
    /// Solar generation (W).
    pub generation_w: f64,
    /// House consumption before shedding (W).
    pub consumption_w: f64,
    /// Battery power: positive = charging, negative = discharging (W).
    pub battery_w: f64,
    /// Power imported from the grid (W, `>= 0`).
    pub grid_draw_w: f64,
    /// Ids of devices shed at the end of this tick.
    pub shed: Vec<String>,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: solar={:.1} W, house={:.1} W, battery={:.1} W, grid={:.1} W",
            self.tick, self.generation_w, self.consumption_w, self.battery_w, self.grid_draw_w
        )?;
        if !self.shed.is_empty() {
            write!(f, ", shed=[{}]", self.shed.join(", "))?;
        }
        Ok(())
    }
}

/// Read-only view of one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    pub id: String,
    pub name: String,
    pub on: bool,
    pub power_w: f64,
    pub priority: Priority,
}

impl From<&Device> for DeviceView {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id().to_string(),
            name: d.name().to_string(),
            on: d.is_on(),
            power_w: d.power_w(),
            priority: d.priority(),
        }
    }
}

/// Immutable picture of the micro-grid after the last completed tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Number of ticks completed so far.
    pub tick: u64,
    /// Battery charge percentage (0 to 100).
    pub battery_pct: f64,
    pub battery_kwh: f64,
    pub battery_capacity_kwh: f64,
    pub battery_state: BatteryState,
    /// Devices in inventory order.
    pub devices: Vec<DeviceView>,
    /// Solar generation at the last tick (W).
    pub solar_w: f64,
    /// House consumption of the devices currently on (W).
    pub consumption_w: f64,
    /// Grid draw at the last tick (W).
    pub grid_draw_w: f64,
    pub alert: Option<String>,
}
