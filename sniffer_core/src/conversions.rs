//! `From` implementations bridging `sniffer_config` types to `sniffer_core` types.

use crate::config::{AlarmCfg, DetectionCfg, GeometryCfg, IngestCfg, SettingDefaults};

// ── GeometryCfg ──────────────────────────────────────────────────────────────

impl From<&sniffer_config::Geometry> for GeometryCfg {
    fn from(c: &sniffer_config::Geometry) -> Self {
        Self {
            sensor1_offset_m: c.sensor1_offset_m,
            sensor2_offset_m: c.sensor2_offset_m,
        }
    }
}

// ── DetectionCfg ─────────────────────────────────────────────────────────────

impl From<&sniffer_config::Detection> for DetectionCfg {
    fn from(c: &sniffer_config::Detection) -> Self {
        Self { tick_ms: c.tick_ms }
    }
}

// ── AlarmCfg ─────────────────────────────────────────────────────────────────

impl From<&sniffer_config::Alarm> for AlarmCfg {
    fn from(c: &sniffer_config::Alarm) -> Self {
        Self {
            tone_ms: c.tone_ms,
            repeat_ms: c.repeat_ms,
        }
    }
}

// ── IngestCfg ────────────────────────────────────────────────────────────────

impl From<&sniffer_config::Ingest> for IngestCfg {
    fn from(c: &sniffer_config::Ingest) -> Self {
        Self {
            read_buf_bytes: c.read_buf_bytes,
        }
    }
}

// ── SettingDefaults ──────────────────────────────────────────────────────────

impl From<&sniffer_config::Config> for SettingDefaults {
    fn from(c: &sniffer_config::Config) -> Self {
        Self {
            baseline_m: c.geometry.baseline_m,
            safety_radius_m: c.detection.safety_radius_m,
            horizon_s: c.detection.horizon_s,
        }
    }
}
