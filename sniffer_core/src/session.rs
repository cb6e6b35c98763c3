//! Session controller: starts and stops the detection and ingestion loops
//! together.

use std::sync::Arc;

use sniffer_traits::Transport;

use crate::alarm::{AlarmController, SharedTone};
use crate::config::{AlarmCfg, DetectionCfg, GeometryCfg, IngestCfg, SettingDefaults};
use crate::detector::Detector;
use crate::error::{Result, SnifferError};
use crate::ingest::{IngestLoop, SharedClock};
use crate::pipeline::{DetectionLoop, DetectionTask, SharedDisplay, SharedSettings};
use crate::smoother::RangeSmoother;
use crate::stats::{SessionStats, StatsSnapshot};

struct Running {
    detection: DetectionLoop,
    ingest: IngestLoop,
}

/// Owns the shared state of one monitoring setup. Built with
/// [`SessionBuilder`](crate::builder::SessionBuilder).
pub struct DetectionSession {
    pub(crate) smoother: Arc<RangeSmoother>,
    pub(crate) settings: SharedSettings,
    pub(crate) defaults: SettingDefaults,
    pub(crate) display: SharedDisplay,
    pub(crate) tone: SharedTone,
    pub(crate) clock: SharedClock,
    pub(crate) geometry: GeometryCfg,
    pub(crate) detection: DetectionCfg,
    pub(crate) alarm: AlarmCfg,
    pub(crate) ingest: IngestCfg,
    pub(crate) stats: Arc<SessionStats>,
    running: Option<Running>,
}

impl core::fmt::Debug for DetectionSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DetectionSession")
            .field("running", &self.is_running())
            .field("smoothed", &self.smoothed())
            .field("defaults", &self.defaults)
            .field("tick_ms", &self.detection.tick_ms)
            .finish_non_exhaustive()
    }
}

impl DetectionSession {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        settings: SharedSettings,
        defaults: SettingDefaults,
        display: SharedDisplay,
        tone: SharedTone,
        clock: SharedClock,
        geometry: GeometryCfg,
        detection: DetectionCfg,
        alarm: AlarmCfg,
        ingest: IngestCfg,
    ) -> Self {
        Self {
            smoother: Arc::new(RangeSmoother::new()),
            settings,
            defaults,
            display,
            tone,
            clock,
            geometry,
            detection,
            alarm,
            ingest,
            stats: Arc::new(SessionStats::default()),
            running: None,
        }
    }

    /// Start both loops on `transport`. A no-op while already running; the
    /// transport is dropped in that case.
    pub fn start<T: Transport + Send + 'static>(&mut self, transport: T) -> Result<()> {
        if self.running.is_some() {
            tracing::debug!("start ignored: session already running");
            return Ok(());
        }
        self.smoother.reset();

        let task = DetectionTask {
            detector: Detector::new(self.geometry, self.detection.tick_ms),
            alarm: AlarmController::new(self.tone.clone(), self.alarm),
            smoother: self.smoother.clone(),
            settings: self.settings.clone(),
            defaults: self.defaults,
            display: self.display.clone(),
            clock: self.clock.clone(),
            stats: self.stats.clone(),
            tick_ms: self.detection.tick_ms,
        };
        let detection = DetectionLoop::spawn(task)
            .map_err(|e| eyre::Report::new(SnifferError::Io(format!("spawn detection loop: {e}"))))?;
        let ingest = IngestLoop::spawn(
            transport,
            self.smoother.clone(),
            self.ingest.read_buf_bytes,
            self.clock.clone(),
            self.stats.clone(),
        )
        .map_err(|e| eyre::Report::new(SnifferError::Io(format!("spawn ingestion loop: {e}"))))?;

        self.running = Some(Running { detection, ingest });
        tracing::info!(tick_ms = self.detection.tick_ms, "detection session started");
        Ok(())
    }

    /// Stop both loops. A no-op while stopped.
    pub fn stop(&mut self) {
        let Some(Running { detection, ingest }) = self.running.take() else {
            return;
        };
        // Detection first: silences the alarm and clears the display.
        drop(detection);
        drop(ingest);
        tracing::info!("detection session stopped");
    }

    /// Stop when running, otherwise open a transport with `connect` and
    /// start. Returns whether the session is running afterwards.
    pub fn toggle<T, F>(&mut self, connect: F) -> Result<bool>
    where
        T: Transport + Send + 'static,
        F: FnOnce() -> Result<T>,
    {
        if self.is_running() {
            self.stop();
            Ok(false)
        } else {
            self.start(connect()?)?;
            Ok(true)
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// False when stopped or once the transport failed or ended.
    pub fn ingest_active(&self) -> bool {
        self.running.as_ref().is_some_and(|r| r.ingest.is_running())
    }

    /// Milliseconds since the last applied sample, while running.
    pub fn ingest_stalled_ms(&self) -> Option<u64> {
        self.running.as_ref().map(|r| r.ingest.stalled_for_now())
    }

    /// Current smoothed `(r1_cm, r2_cm)`.
    pub fn smoothed(&self) -> (f64, f64) {
        self.smoother.latest()
    }

    /// Counters accumulated over every run of this session.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn defaults(&self) -> SettingDefaults {
        self.defaults
    }
}

impl Drop for DetectionSession {
    fn drop(&mut self) {
        self.stop();
    }
}
