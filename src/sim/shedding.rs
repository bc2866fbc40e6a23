//! Priority-based automatic load shedding.

use crate::devices::Device;

/// Result of evaluating the shedding policy for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShedOutcome {
    /// Alert to display, `None` when the grid is not stressed.
    pub alert: Option<String>,
    /// Ids of devices switched off during this evaluation.
    pub shed: Vec<String>,
}

/// Returns `true` when the house draws from the grid while the battery
/// sits below the reserve threshold.
pub fn is_stressed(charge_pct: f64, grid_draw_w: f64, reserve_pct: f64) -> bool {
    charge_pct < reserve_pct && grid_draw_w > 0.0
}

/// Formats the low-reserve alert with the charge rounded to one decimal.
pub fn alert_message(charge_pct: f64) -> String {
    format!("ALERT: battery at {charge_pct:.1}%. Shedding non-essential devices.")
}

/// Applies the shedding policy to `devices`.
///
/// In the stressed state every non-essential device that is on gets
/// switched off and an alert is produced. Devices are never switched back
/// on here; that takes an explicit command.
pub fn apply(
    devices: &mut [Device],
    charge_pct: f64,
    grid_draw_w: f64,
    reserve_pct: f64,
) -> ShedOutcome {
    if !is_stressed(charge_pct, grid_draw_w, reserve_pct) {
        return ShedOutcome::default();
    }

    let mut shed = Vec::new();
    for device in devices
        .iter_mut()
        .filter(|d| d.priority().is_sheddable() && d.is_on())
    {
        device.turn_off();
        tracing::warn!(device = %device.id(), charge_pct, "shed non-essential device");
        shed.push(device.id().to_string());
    }

    ShedOutcome {
        alert: Some(alert_message(charge_pct)),
        shed,
    }
}
