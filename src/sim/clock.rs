use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time for the solar model.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::clock::{Clock, FixedClock};
///
/// let clock = FixedClock(120.0);
/// assert_eq!(clock.now_secs(), 120.0);
/// ```
pub trait Clock: Send + Sync {
    /// Seconds since an arbitrary, fixed epoch.
    fn now_secs(&self) -> f64;
}

/// Reads seconds since the Unix epoch from the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        // A clock set before 1970 degrades to solar night rather than failing.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}
