//! Per-tick power balance between solar, house load, battery and grid.

use crate::devices::Battery;

/// Length of one simulation tick in seconds.
pub const TICK_SECONDS: f64 = 1.0;

/// How one tick's balance was settled.
///
/// Sign conventions:
/// - `balance_w`: positive = surplus, negative = deficit
/// - `battery_w`: positive = charging, negative = discharging
/// - `grid_draw_w`: always `>= 0` (import only; surplus is never exported)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceOutcome {
    pub balance_w: f64,
    pub battery_w: f64,
    pub grid_draw_w: f64,
}

/// Settles `generation_w - consumption_w` against the battery and grid.
///
/// A surplus goes entirely into the battery. A deficit is covered by the
/// battery only while it holds charge and sits strictly above
/// `reserve_pct`; otherwise the battery is marked idle. Whatever the
/// battery cannot cover is drawn from the grid.
///
/// # Arguments
///
/// * `battery` - Battery to charge or discharge for one tick
/// * `generation_w` - Solar output this tick (W)
/// * `consumption_w` - Sum of device draws this tick (W)
/// * `reserve_pct` - Charge percentage at or below which the battery stops
///   supplying the house
pub fn settle(
    battery: &mut Battery,
    generation_w: f64,
    consumption_w: f64,
    reserve_pct: f64,
) -> BalanceOutcome {
    let balance_w = generation_w - consumption_w;

    if balance_w > 0.0 {
        battery.charge(balance_w, TICK_SECONDS);
        return BalanceOutcome {
            balance_w,
            battery_w: balance_w,
            grid_draw_w: 0.0,
        };
    }

    let mut required_w = -balance_w;
    let mut battery_w = 0.0;

    if battery.charge_kwh() > 0.0 && battery.charge_percentage() > reserve_pct {
        let supplied_w = required_w.min(battery.deliverable_w(TICK_SECONDS));
        battery.discharge(supplied_w, TICK_SECONDS);
        required_w -= supplied_w;
        battery_w = -supplied_w;
    } else {
        battery.set_idle();
    }

    BalanceOutcome {
        balance_w,
        battery_w,
        grid_draw_w: required_w,
    }
}
