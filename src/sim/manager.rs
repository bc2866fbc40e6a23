//! The energy manager that owns the battery and devices, plus the locked
//! handle shared between the tick driver and the API.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::devices::{Battery, Device, SolarArray};

use super::clock::Clock;
use super::power_balance;
use super::shedding;
use super::types::{Action, CommandError, CommandOutcome, DeviceView, Snapshot, TickReport};

/// Default reserve threshold, in percent of battery capacity.
pub const DEFAULT_RESERVE_PCT: f64 = 20.0;

/// Owns one battery and the device inventory and runs the tick algorithm.
///
/// Transient fields (`generation_w`, `grid_draw_w`, `alert`) always describe
/// the most recently completed tick.
pub struct EnergyManager {
    battery: Battery,
    devices: Vec<Device>,
    solar: SolarArray,
    clock: Box<dyn Clock>,
    reserve_pct: f64,
    tick: u64,
    generation_w: f64,
    grid_draw_w: f64,
    alert: Option<String>,
}

impl EnergyManager {
    /// Creates a manager with the default 20 % reserve threshold.
    ///
    /// # Arguments
    ///
    /// * `battery` - Home battery
    /// * `devices` - Device inventory; order is kept for display
    /// * `solar` - Solar generation model
    /// * `clock` - Wall-clock source for the solar model
    pub fn new(
        battery: Battery,
        devices: Vec<Device>,
        solar: SolarArray,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            battery,
            devices,
            solar,
            clock: Box::new(clock),
            reserve_pct: DEFAULT_RESERVE_PCT,
            tick: 0,
            generation_w: 0.0,
            grid_draw_w: 0.0,
            alert: None,
        }
    }

    /// Overrides the reserve threshold (percent).
    #[must_use]
    pub fn with_reserve_pct(mut self, reserve_pct: f64) -> Self {
        self.reserve_pct = reserve_pct;
        self
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Mutable battery access for seeding scenarios.
    pub fn battery_mut(&mut self) -> &mut Battery {
        &mut self.battery
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Looks up a device by id.
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id() == id)
    }

    pub fn reserve_pct(&self) -> f64 {
        self.reserve_pct
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Solar generation computed by the last tick (W).
    pub fn generation_w(&self) -> f64 {
        self.generation_w
    }

    /// Grid draw computed by the last tick (W).
    pub fn grid_draw_w(&self) -> f64 {
        self.grid_draw_w
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Sum of the rated draw of every device that is on (W).
    pub fn consumption_w(&self) -> f64 {
        self.devices.iter().map(Device::draw_w).sum()
    }

    /// Runs one tick at the current time of the manager's clock.
    pub fn step(&mut self) -> TickReport {
        let now = self.clock.now_secs();
        self.step_at(now)
    }

    /// Runs one tick with the solar model evaluated at `now_secs`.
    ///
    /// Order: solar generation, house consumption, balance settlement
    /// against battery and grid, then the shedding policy.
    pub fn step_at(&mut self, now_secs: f64) -> TickReport {
        let generation_w = self.solar.generation_w(now_secs);
        let consumption_w = self.consumption_w();

        let balance = power_balance::settle(
            &mut self.battery,
            generation_w,
            consumption_w,
            self.reserve_pct,
        );

        let charge_pct = self.battery.charge_percentage();
        let shed = shedding::apply(
            &mut self.devices,
            charge_pct,
            balance.grid_draw_w,
            self.reserve_pct,
        );

        match (&self.alert, &shed.alert) {
            (None, Some(alert)) => tracing::warn!(%alert, "reserve alert raised"),
            (Some(_), None) => tracing::info!(charge_pct, "reserve alert cleared"),
            _ => {}
        }

        self.tick += 1;
        self.generation_w = generation_w;
        self.grid_draw_w = balance.grid_draw_w;
        self.alert = shed.alert;

        let report = TickReport {
            tick: self.tick,
            generation_w,
            consumption_w,
            battery_w: balance.battery_w,
            grid_draw_w: balance.grid_draw_w,
            shed: shed.shed,
        };
        tracing::debug!(charge_pct, state = ?self.battery.state(), "{report}");
        report
    }

    /// Builds a read-only view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            battery_pct: self.battery.charge_percentage(),
            battery_kwh: self.battery.charge_kwh(),
            battery_capacity_kwh: self.battery.capacity_kwh(),
            battery_state: self.battery.state(),
            devices: self.devices.iter().map(DeviceView::from).collect(),
            solar_w: self.generation_w,
            consumption_w: self.consumption_w(),
            grid_draw_w: self.grid_draw_w,
            alert: self.alert.clone(),
        }
    }

    /// Switches a device and immediately runs one extra tick.
    ///
    /// The device is looked up before the action is parsed, so an unknown
    /// device is reported as [`CommandError::DeviceNotFound`] whatever the
    /// action. On error nothing is mutated and no tick runs.
    ///
    /// The returned state is read after the forced tick, so a device
    /// switched on while the grid is stressed comes back already shed.
    pub fn apply_command(
        &mut self,
        device_id: &str,
        action: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let idx = self
            .devices
            .iter()
            .position(|d| d.id() == device_id)
            .ok_or_else(|| CommandError::DeviceNotFound {
                id: device_id.to_string(),
            })?;
        let action: Action = action.parse()?;

        let device = &mut self.devices[idx];
        match action {
            Action::On => device.turn_on(),
            Action::Off => device.turn_off(),
        };

        self.step();

        let device = &self.devices[idx];
        Ok(CommandOutcome {
            id: device.id().to_string(),
            name: device.name().to_string(),
            on: device.is_on(),
        })
    }
}

/// Cloneable handle to the single [`EnergyManager`], guarded by one lock.
///
/// Every operation holds the lock for its whole duration, so readers see
/// the state either before or after a tick, never in between. The lock is
/// not re-entrant; the command path runs its forced tick inside
/// [`EnergyManager::apply_command`] without re-acquiring it.
#[derive(Clone)]
pub struct SharedGrid {
    inner: Arc<Mutex<EnergyManager>>,
}

impl SharedGrid {
    pub fn new(manager: EnergyManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    // Between operations the manager is always consistent, so a panic in
    // another holder leaves nothing half-applied worth refusing.
    fn lock(&self) -> MutexGuard<'_, EnergyManager> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one tick under the lock.
    pub fn step(&self) -> TickReport {
        self.lock().step()
    }

    /// Reads a snapshot under the lock.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Applies a command and its forced tick in one lock span.
    pub fn apply_command(
        &self,
        device_id: &str,
        action: &str,
    ) -> Result<CommandOutcome, CommandError> {
        self.lock().apply_command(device_id, action)
    }

    /// Runs `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut EnergyManager) -> R) -> R {
        f(&mut self.lock())
    }
}
