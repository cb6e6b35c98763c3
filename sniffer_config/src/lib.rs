#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and recording parsing for the collision-warning system.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty document yields the defaults.
//! - The recording CSV loader enforces headers so replays cannot silently
//!   swap the two range columns.
use serde::Deserialize;

/// Recorded range sample.
///
/// Expected headers:
/// r1_cm,r2_cm
///
/// Example:
/// r1_cm,r2_cm
/// 385.3,385.3
/// 375.3,375.3
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RecordingRow {
    pub r1_cm: f64,
    pub r2_cm: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Geometry {
    /// Default sensor separation `w` in meters (live setting overrides it).
    pub baseline_m: f64,
    /// Subtracted from sensor 1 readings after cm -> m conversion.
    pub sensor1_offset_m: f64,
    /// Subtracted from sensor 2 readings after cm -> m conversion.
    pub sensor2_offset_m: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            baseline_m: 0.5,
            sensor1_offset_m: -0.15,
            sensor2_offset_m: -0.15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Detection {
    /// Default safety radius `r` in meters.
    pub safety_radius_m: f64,
    /// Default prediction horizon `t` in seconds.
    pub horizon_s: f64,
    /// Detection tick period.
    pub tick_ms: u64,
}

impl Default for Detection {
    fn default() -> Self {
        Self {
            safety_radius_m: 2.0,
            horizon_s: 1.0,
            tick_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Alarm {
    pub tone_ms: u64,
    pub repeat_ms: u64,
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            tone_ms: 500,
            repeat_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Ingest {
    /// Size of the transport read buffer.
    pub read_buf_bytes: usize,
}

impl Default for Ingest {
    fn default() -> Self {
        Self {
            read_buf_bytes: 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TransportCfg {
    pub connect_timeout_ms: u64,
}

impl Default for TransportCfg {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sim {
    pub start_x_m: f64,
    pub start_y_m: f64,
    pub velocity_x_mps: f64,
    pub velocity_y_mps: f64,
    /// The simulated object halts once it reaches this x.
    pub stop_x_m: f64,
    /// Readings per second (also the replay rate).
    pub rate_hz: u32,
}

impl Default for Sim {
    fn default() -> Self {
        Self {
            start_x_m: -4.0,
            start_y_m: 0.1,
            velocity_x_mps: 2.0,
            velocity_y_mps: 0.0,
            stop_x_m: -0.3,
            rate_hz: 20,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub geometry: Geometry,
    pub detection: Detection,
    pub alarm: Alarm,
    pub ingest: Ingest,
    pub transport: TransportCfg,
    pub sim: Sim,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_recording_csv(path: &std::path::Path) -> eyre::Result<Vec<RecordingRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open recording CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["r1_cm", "r2_cm"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "recording CSV must have headers 'r1_cm,r2_cm', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<RecordingRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("recording CSV {:?} has no rows", path);
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Geometry
        if !self.geometry.baseline_m.is_finite() || self.geometry.baseline_m <= 0.0 {
            eyre::bail!("geometry.baseline_m must be a finite value > 0");
        }
        if !self.geometry.sensor1_offset_m.is_finite()
            || !self.geometry.sensor2_offset_m.is_finite()
        {
            eyre::bail!("geometry sensor offsets must be finite");
        }

        // Detection
        if !self.detection.safety_radius_m.is_finite() || self.detection.safety_radius_m < 0.0 {
            eyre::bail!("detection.safety_radius_m must be a finite value >= 0");
        }
        if !self.detection.horizon_s.is_finite() || self.detection.horizon_s < 0.0 {
            eyre::bail!("detection.horizon_s must be a finite value >= 0");
        }
        if self.detection.tick_ms == 0 {
            eyre::bail!("detection.tick_ms must be >= 1");
        }
        if self.detection.tick_ms > 1000 {
            eyre::bail!("detection.tick_ms is unreasonably large (>1s)");
        }

        // Alarm
        if self.alarm.tone_ms == 0 {
            eyre::bail!("alarm.tone_ms must be >= 1");
        }
        if self.alarm.repeat_ms == 0 {
            eyre::bail!("alarm.repeat_ms must be >= 1");
        }

        // Ingest
        if self.ingest.read_buf_bytes < 16 {
            eyre::bail!("ingest.read_buf_bytes must be >= 16");
        }

        // Transport
        if self.transport.connect_timeout_ms == 0 {
            eyre::bail!("transport.connect_timeout_ms must be >= 1");
        }

        // Sim
        if self.sim.rate_hz == 0 {
            eyre::bail!("sim.rate_hz must be > 0");
        }
        let sim_coords = [
            self.sim.start_x_m,
            self.sim.start_y_m,
            self.sim.velocity_x_mps,
            self.sim.velocity_y_mps,
            self.sim.stop_x_m,
        ];
        if sim_coords.iter().any(|v| !v.is_finite()) {
            eyre::bail!("sim coordinates and velocities must be finite");
        }

        // Logging
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
