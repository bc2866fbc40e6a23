use std::f64::consts::PI;

/// Rooftop solar array following a half-sine arch over a compressed day.
///
/// The phase is taken from wall-clock seconds rather than a tick count,
/// so missed or late ticks never shift the curve.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::SolarArray;
///
/// let pv = SolarArray::new(3000.0, 240.0);
/// assert_eq!(pv.generation_w(0.0), 0.0);        // solar night
/// assert!((pv.generation_w(120.0) - 3000.0).abs() < 1e-9); // solar noon
/// ```
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Output at solar noon in watts.
    pub peak_w: f64,
    /// Length of one simulated day in wall-clock seconds.
    pub day_length_secs: f64,
}

impl SolarArray {
    /// Creates a solar array.
    ///
    /// # Panics
    ///
    /// Panics if `day_length_secs` is not strictly positive.
    pub fn new(peak_w: f64, day_length_secs: f64) -> Self {
        assert!(day_length_secs > 0.0, "day_length_secs must be > 0");
        Self {
            peak_w: peak_w.max(0.0),
            day_length_secs,
        }
    }

    /// Position within the simulated day, in `[0, 1)`.
    pub fn phase(&self, now_secs: f64) -> f64 {
        now_secs.rem_euclid(self.day_length_secs) / self.day_length_secs
    }

    /// Generation in watts at wall-clock time `now_secs`.
    pub fn generation_w(&self, now_secs: f64) -> f64 {
        (self.peak_w * (self.phase(now_secs) * PI).sin()).max(0.0)
    }
}

impl Default for SolarArray {
    fn default() -> Self {
        Self::new(3000.0, 240.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_cycle_boundaries() {
        let pv = SolarArray::default();
        assert_eq!(pv.generation_w(0.0), 0.0);
        assert!(pv.generation_w(240.0).abs() < 1e-9);
        assert!(pv.generation_w(480.0).abs() < 1e-9);
    }

    #[test]
    fn peaks_at_solar_noon() {
        let pv = SolarArray::default();
        assert!((pv.generation_w(120.0) - 3000.0).abs() < 1e-9);
        assert!((pv.generation_w(360.0) - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn arch_is_symmetric() {
        let pv = SolarArray::default();
        let morning = pv.generation_w(60.0);
        let evening = pv.generation_w(180.0);
        assert!((morning - evening).abs() < 1e-9);
        assert!(morning > 0.0 && morning < 3000.0);
    }

    #[test]
    fn never_negative_or_above_peak() {
        let pv = SolarArray::default();
        for t in 0..1000 {
            let w = pv.generation_w(f64::from(t) * 0.7);
            assert!((0.0..=3000.0).contains(&w), "t={t}: {w}");
        }
    }

    #[test]
    fn phase_wraps_for_negative_time() {
        let pv = SolarArray::default();
        assert!((pv.phase(-60.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn negative_peak_clamped() {
        let pv = SolarArray::new(-100.0, 240.0);
        assert_eq!(pv.generation_w(120.0), 0.0);
    }

    #[test]
    #[should_panic]
    fn zero_day_length_panics() {
        SolarArray::new(3000.0, 0.0);
    }
}
