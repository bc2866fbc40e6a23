use serde::{Deserialize, Serialize};

/// Ordinal importance of a household device.
///
/// Ordering is `Essential < Medium < Low`. Only the split between
/// `Essential` and everything above it matters to the shedding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Never shed automatically.
    Essential,
    /// Shed when reserves run low.
    Medium,
    /// Shed when reserves run low.
    Low,
}

impl Priority {
    /// Returns `true` for every class the shedding policy may switch off.
    pub fn is_sheddable(self) -> bool {
        self > Self::Essential
    }
}

/// A controllable household load with a fixed rated draw.
///
/// Only the on/off state is mutable after construction; identity, name,
/// rated power and priority are fixed for the lifetime of the device.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::{Device, Priority};
///
/// let mut fridge = Device::new("geladeira", "Fridge", 150.0, Priority::Essential);
/// assert!(!fridge.is_on());
/// assert!(fridge.turn_on());
/// assert_eq!(fridge.draw_w(), 150.0);
/// ```
#[derive(Debug, Clone)]
pub struct Device {
    id: String,
    name: String,
    power_w: f64,
    priority: Priority,
    on: bool,
}

impl Device {
    /// Creates a device in the off state.
    ///
    /// Negative ratings are clamped to zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        power_w: f64,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power_w: power_w.max(0.0),
            priority,
            on: false,
        }
    }

    /// Identifier used by commands and snapshots.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rated power draw in watts when switched on.
    pub fn power_w(&self) -> f64 {
        self.power_w
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Current draw in watts: the rated power when on, zero when off.
    pub fn draw_w(&self) -> f64 {
        if self.on { self.power_w } else { 0.0 }
    }

    /// Switches the device on and returns the resulting state.
    ///
    /// Idempotent; a transition event is logged only when the state changes.
    pub fn turn_on(&mut self) -> bool {
        self.set_on(true)
    }

    /// Switches the device off and returns the resulting state.
    ///
    /// Idempotent; a transition event is logged only when the state changes.
    pub fn turn_off(&mut self) -> bool {
        self.set_on(false)
    }

    fn set_on(&mut self, on: bool) -> bool {
        if self.on != on {
            self.on = on;
            tracing::info!(
                device = %self.id,
                name = %self.name,
                on,
                "device switched {}",
                if on { "on" } else { "off" }
            );
        }
        self.on
    }
}
