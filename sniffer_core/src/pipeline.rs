//! Detection tick loop.
//!
//! Ticks run strictly one after another on their own thread: resolve live
//! params, read the smoothed ranges, run the detector, drive the alarm,
//! publish the status, then sleep one tick period. Stopping the loop forces
//! the alarm off and clears the display.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use sniffer_traits::{SettingsSource, StatusDisplay};

use crate::alarm::AlarmController;
use crate::config::SettingDefaults;
use crate::detector::{Detector, TickOutcome};
use crate::error::SnifferError;
use crate::ingest::SharedClock;
use crate::settings::DetectionParams;
use crate::smoother::RangeSmoother;
use crate::stats::{SessionStats, bump};
use crate::util::tick_period;

/// Display shared between the session and its detection loop.
pub type SharedDisplay = Arc<Mutex<Box<dyn StatusDisplay + Send>>>;
/// Live settings as seen by the detection loop.
pub type SharedSettings = Arc<dyn SettingsSource + Send + Sync>;

/// Everything one detection loop owns or shares.
pub struct DetectionTask {
    pub detector: Detector,
    pub alarm: AlarmController,
    pub smoother: Arc<RangeSmoother>,
    pub settings: SharedSettings,
    pub defaults: SettingDefaults,
    pub display: SharedDisplay,
    pub clock: SharedClock,
    pub stats: Arc<SessionStats>,
    pub tick_ms: u64,
}

impl DetectionTask {
    /// Run a single tick. Returns what the detector saw.
    pub fn run_tick(&mut self) -> TickOutcome {
        let params = DetectionParams::resolve(&*self.settings, &self.defaults);
        let outcome = self.detector.tick(self.smoother.latest(), &params);
        bump(&self.stats.ticks);

        match outcome {
            TickOutcome::NoSignal => {
                bump(&self.stats.skipped);
            }
            TickOutcome::InvalidGeometry {
                r1_cm,
                r2_cm,
                baseline_m,
            } => {
                bump(&self.stats.rejected_geometry);
                let err = SnifferError::InvalidGeometry {
                    r1_cm,
                    r2_cm,
                    baseline_m,
                };
                tracing::debug!(error = %err, "tick skipped");
            }
            TickOutcome::Tracked(report) => {
                bump(&self.stats.positions);
                if let Some(state) = report.state
                    && self.alarm.apply(state)
                    && state.is_warning()
                {
                    bump(&self.stats.warnings_entered);
                }
                let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
                if let Err(e) = display.show(&report) {
                    tracing::warn!(error = %e, "status display failed");
                }
            }
        }
        outcome
    }

    fn teardown(&mut self) {
        self.alarm.stop();
        let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = display.clear() {
            tracing::warn!(error = %e, "status display clear failed");
        }
    }
}

pub struct DetectionLoop {
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl DetectionLoop {
    pub fn spawn(mut task: DetectionTask) -> std::io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let period = tick_period(task.tick_ms);

        let join_handle = std::thread::Builder::new()
            .name("sniffer-detect".into())
            .spawn(move || {
                while !shutdown_clone.load(Ordering::Relaxed) {
                    task.run_tick();
                    if shutdown_clone.load(Ordering::Relaxed) {
                        break;
                    }
                    task.clock.sleep(period);
                }
                task.teardown();
                tracing::trace!("detection thread exiting cleanly");
            })?;

        Ok(Self {
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for DetectionLoop {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Exits within one tick period.
        if let Some(handle) = self.join_handle.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!(?e, "detection thread panicked during shutdown");
        }
    }
}
