//! Background task that advances the simulation at a fixed cadence.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::manager::SharedGrid;

/// Handle to the free-running tick loop.
///
/// The loop ticks immediately on start and then once per `period`. Late
/// ticks are delayed rather than bunched up; the solar model reads
/// wall-clock time, so skipped ticks do not distort generation.
pub struct TickDriver {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TickDriver {
    /// Spawns the tick loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside a tokio runtime.
    pub fn spawn(grid: SharedGrid, period: Duration) -> Self {
        let (stop, mut stop_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(?period, "tick driver started");
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        grid.step();
                    }
                }
            }
            tracing::info!("tick driver stopped");
        });
        Self { stop, handle }
    }

    /// Stops the loop and waits for the in-flight tick, if any, to finish.
    pub async fn shutdown(self) {
        // The receiver is gone only if the task already ended.
        let _ = self.stop.send(());
        if let Err(err) = self.handle.await {
            tracing::error!(%err, "tick driver task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Battery, SolarArray};
    use crate::sim::clock::FixedClock;
    use crate::sim::manager::EnergyManager;

    fn grid() -> SharedGrid {
        SharedGrid::new(EnergyManager::new(
            Battery::new(10.0, 5.0),
            Vec::new(),
            SolarArray::default(),
            FixedClock(0.0),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let grid = grid();
        let driver = TickDriver::spawn(grid.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        driver.shutdown().await;

        // Ticks at t = 0, 1, 2, 3.
        let ticks = grid.snapshot().tick;
        assert!((3..=4).contains(&ticks), "got {ticks} ticks");
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_shutdown() {
        let grid = grid();
        let driver = TickDriver::spawn(grid.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        driver.shutdown().await;

        let ticks = grid.snapshot().tick;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(grid.snapshot().tick, ticks);
    }
}
