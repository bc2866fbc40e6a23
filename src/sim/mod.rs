/// Wall-clock sources for the solar model.
pub mod clock;
/// Background tick loop.
pub mod driver;
pub mod manager;
pub mod power_balance;
/// Low-reserve load-shedding policy.
pub mod shedding;
pub mod types;
