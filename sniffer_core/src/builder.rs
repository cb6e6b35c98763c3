//! Builder for [`DetectionSession`].
//!
//! Display and tone emitter are required; everything else has a default.
//! `build()` validates the runtime config before any thread exists.

use std::sync::{Arc, Mutex};

use sniffer_traits::clock::{Clock, MonotonicClock};
use sniffer_traits::{SettingsSource, StatusDisplay, ToneEmitter};

use crate::alarm::SharedTone;
use crate::config::{AlarmCfg, DetectionCfg, GeometryCfg, IngestCfg, SettingDefaults};
use crate::error::{BuildError, Result};
use crate::ingest::SharedClock;
use crate::pipeline::{SharedDisplay, SharedSettings};
use crate::session::DetectionSession;
use crate::settings::LiveSettings;

#[derive(Default)]
pub struct SessionBuilder {
    display: Option<SharedDisplay>,
    tone: Option<SharedTone>,
    settings: Option<SharedSettings>,
    clock: Option<SharedClock>,
    defaults: Option<SettingDefaults>,
    geometry: Option<GeometryCfg>,
    detection: Option<DetectionCfg>,
    alarm: Option<AlarmCfg>,
    ingest: Option<IngestCfg>,
}

impl DetectionSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every runtime section from a validated file config.
    pub fn from_config(cfg: &sniffer_config::Config) -> Self {
        Self::default()
            .with_defaults(SettingDefaults::from(cfg))
            .with_geometry(GeometryCfg::from(&cfg.geometry))
            .with_detection(DetectionCfg::from(&cfg.detection))
            .with_alarm(AlarmCfg::from(&cfg.alarm))
            .with_ingest(IngestCfg::from(&cfg.ingest))
    }

    pub fn with_display(mut self, display: impl StatusDisplay + Send + 'static) -> Self {
        let display: Box<dyn StatusDisplay + Send> = Box::new(display);
        self.display = Some(Arc::new(Mutex::new(display)));
        self
    }

    pub fn with_tone(mut self, tone: impl ToneEmitter + Send + 'static) -> Self {
        let tone: Box<dyn ToneEmitter + Send> = Box::new(tone);
        self.tone = Some(Arc::new(Mutex::new(tone)));
        self
    }

    /// Live settings source; defaults to an empty [`LiveSettings`].
    pub fn with_settings(mut self, settings: impl SettingsSource + Send + Sync + 'static) -> Self {
        let settings: SharedSettings = Arc::new(settings);
        self.settings = Some(settings);
        self
    }

    /// Defaults to [`MonotonicClock`].
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        let clock: SharedClock = Arc::new(clock);
        self.clock = Some(clock);
        self
    }

    pub fn with_defaults(mut self, defaults: SettingDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryCfg) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_detection(mut self, detection: DetectionCfg) -> Self {
        self.detection = Some(detection);
        self
    }

    pub fn with_alarm(mut self, alarm: AlarmCfg) -> Self {
        self.alarm = Some(alarm);
        self
    }

    pub fn with_ingest(mut self, ingest: IngestCfg) -> Self {
        self.ingest = Some(ingest);
        self
    }

    pub fn build(self) -> Result<DetectionSession> {
        let display = self
            .display
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;
        let tone = self
            .tone
            .ok_or_else(|| eyre::Report::new(BuildError::MissingTone))?;

        let defaults = self.defaults.unwrap_or_default();
        let geometry = self.geometry.unwrap_or_default();
        let detection = self.detection.unwrap_or_default();
        let alarm = self.alarm.unwrap_or_default();
        let ingest = self.ingest.unwrap_or_default();

        let invalid = |msg| Err(eyre::Report::new(BuildError::InvalidConfig(msg)));
        if !defaults.baseline_m.is_finite() || defaults.baseline_m <= 0.0 {
            return invalid("default baseline must be finite and > 0");
        }
        if !defaults.safety_radius_m.is_finite() || defaults.safety_radius_m < 0.0 {
            return invalid("default safety radius must be finite and >= 0");
        }
        if !defaults.horizon_s.is_finite() || defaults.horizon_s < 0.0 {
            return invalid("default horizon must be finite and >= 0");
        }
        if !geometry.sensor1_offset_m.is_finite() || !geometry.sensor2_offset_m.is_finite() {
            return invalid("sensor offsets must be finite");
        }
        if detection.tick_ms == 0 {
            return invalid("tick_ms must be >= 1");
        }
        if alarm.tone_ms == 0 || alarm.repeat_ms == 0 {
            return invalid("alarm tone_ms and repeat_ms must be >= 1");
        }
        if ingest.read_buf_bytes < 16 {
            return invalid("read_buf_bytes must be >= 16");
        }

        let settings: SharedSettings = match self.settings {
            Some(s) => s,
            None => Arc::new(LiveSettings::new()),
        };
        let clock: SharedClock = match self.clock {
            Some(c) => c,
            None => Arc::new(MonotonicClock::new()),
        };

        Ok(DetectionSession::new(
            settings, defaults, display, tone, clock, geometry, detection, alarm, ingest,
        ))
    }
}
