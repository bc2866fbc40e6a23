use serde::{Deserialize, Serialize};

/// Joules per kilowatt-hour: `W·s / 3600 → Wh`, `Wh / 1000 → kWh`.
const JOULES_PER_KWH: f64 = 3600.0 * 1000.0;

/// Label of the battery's most recent operation.
///
/// This is not derived continuously: it reflects whatever the last call
/// to [`Battery::charge`], [`Battery::discharge`] or [`Battery::set_idle`]
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryState {
    Charging,
    Discharging,
    #[default]
    Idle,
}

/// A home storage battery.
///
/// Converts applied power over elapsed time into stored energy and keeps
/// the stored charge clamped to `[0, capacity_kwh]`.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::{Battery, BatteryState};
///
/// let mut battery = Battery::new(10.0, 5.0);
/// battery.charge(3600.0, 1000.0); // 1 kWh
/// assert!((battery.charge_kwh() - 6.0).abs() < 1e-9);
/// assert_eq!(battery.state(), BatteryState::Charging);
/// ```
#[derive(Debug, Clone)]
pub struct Battery {
    capacity_kwh: f64,
    charge_kwh: f64,
    state: BatteryState,
}

impl Battery {
    /// Creates an idle battery.
    ///
    /// A negative capacity is treated as zero and the initial charge is
    /// clamped into `[0, capacity_kwh]`.
    pub fn new(capacity_kwh: f64, initial_charge_kwh: f64) -> Self {
        let capacity_kwh = capacity_kwh.max(0.0);
        Self {
            capacity_kwh,
            charge_kwh: initial_charge_kwh.clamp(0.0, capacity_kwh),
            state: BatteryState::Idle,
        }
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    /// Currently stored energy in kWh.
    pub fn charge_kwh(&self) -> f64 {
        self.charge_kwh
    }

    pub fn state(&self) -> BatteryState {
        self.state
    }

    /// Stored charge as a percentage of capacity, in `[0, 100]`.
    ///
    /// A zero-capacity battery reports 0.
    pub fn charge_percentage(&self) -> f64 {
        if self.capacity_kwh == 0.0 {
            return 0.0;
        }
        self.charge_kwh / self.capacity_kwh * 100.0
    }

    /// Adds `power_w × seconds` of energy, saturating at capacity.
    ///
    /// Always records [`BatteryState::Charging`], even if the battery was
    /// already full and the energy was discarded.
    pub fn charge(&mut self, power_w: f64, seconds: f64) {
        let energy_kwh = power_w * seconds / JOULES_PER_KWH;
        self.charge_kwh = self.capacity_kwh.min(self.charge_kwh + energy_kwh);
        self.state = BatteryState::Charging;
    }

    /// Removes `power_w × seconds` of energy, saturating at empty.
    pub fn discharge(&mut self, power_w: f64, seconds: f64) {
        let energy_kwh = power_w * seconds / JOULES_PER_KWH;
        self.charge_kwh = (self.charge_kwh - energy_kwh).max(0.0);
        self.state = BatteryState::Discharging;
    }

    /// Marks the battery as sitting out of this tick's balance.
    pub fn set_idle(&mut self) {
        self.state = BatteryState::Idle;
    }

    /// The constant power that would drain the whole stored charge in
    /// `seconds`.
    pub fn deliverable_w(&self, seconds: f64) -> f64 {
        self.charge_kwh * JOULES_PER_KWH / seconds
    }

    /// Overwrites the stored charge, clamped to `[0, capacity_kwh]`.
    ///
    /// Used to seed scenarios; the activity state is left untouched.
    pub fn set_charge_kwh(&mut self, charge_kwh: f64) {
        self.charge_kwh = charge_kwh.clamp(0.0, self.capacity_kwh);
    }
}
