//! Runtime configuration for the detection engine.
//!
//! These are the structs consumed by `DetectionSession`. They are separate
//! from the TOML-deserialized config in `sniffer_config`.

/// Fixed sensor geometry that does not change while a session runs.
#[derive(Debug, Clone, Copy)]
pub struct GeometryCfg {
    /// Subtracted from sensor 1 range (meters) before trilateration.
    pub sensor1_offset_m: f64,
    /// Subtracted from sensor 2 range (meters) before trilateration.
    pub sensor2_offset_m: f64,
}

impl Default for GeometryCfg {
    fn default() -> Self {
        Self {
            sensor1_offset_m: -0.15,
            sensor2_offset_m: -0.15,
        }
    }
}

/// Detection tick pacing.
#[derive(Debug, Clone, Copy)]
pub struct DetectionCfg {
    /// Tick period in milliseconds; also the time base of the motion estimate.
    pub tick_ms: u64,
}

impl Default for DetectionCfg {
    fn default() -> Self {
        Self { tick_ms: 50 }
    }
}

/// Repeating alarm tone.
#[derive(Debug, Clone, Copy)]
pub struct AlarmCfg {
    pub tone_ms: u64,
    pub repeat_ms: u64,
}

impl Default for AlarmCfg {
    fn default() -> Self {
        Self {
            tone_ms: 500,
            repeat_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IngestCfg {
    pub read_buf_bytes: usize,
}

impl Default for IngestCfg {
    fn default() -> Self {
        Self {
            read_buf_bytes: 1024,
        }
    }
}

/// Values used when a live setting is absent or unparsable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingDefaults {
    pub baseline_m: f64,
    pub safety_radius_m: f64,
    pub horizon_s: f64,
}

impl Default for SettingDefaults {
    fn default() -> Self {
        Self {
            baseline_m: 0.5,
            safety_radius_m: 2.0,
            horizon_s: 1.0,
        }
    }
}
