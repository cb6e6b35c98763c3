#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core collision-warning logic (transport-agnostic).
//!
//! All I/O goes through the `sniffer_traits` seams: `Transport` for range
//! payloads, `StatusDisplay` and `ToneEmitter` for output, `SettingsSource`
//! for the live w/r/t inputs.
//!
//! ## Architecture
//!
//! - **Smoothing**: payload parsing and the shared EMA range pair (`smoother`)
//! - **Geometry**: two-range trilateration with sentinel fallback (`trilateration`)
//! - **Motion**: bounded history, step vectors, smoothed velocity (`motion`)
//! - **Prediction**: extrapolation and closest approach (`predictor`)
//! - **Decision**: consecutive-count gate and alarm state machine
//!   (`hysteresis`, `alarm`)
//! - **Scheduling**: detection tick loop, ingestion loop and the session that
//!   starts/stops them (`pipeline`, `ingest`, `session`)
//!
//! Runtime loops never return errors; failures are logged and absorbed.
//! Only setup (build, spawn) is fallible.

pub mod alarm;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod detector;
pub mod error;
pub mod hw_error;
pub mod hysteresis;
pub mod ingest;
pub mod mocks;
pub mod motion;
pub mod pipeline;
pub mod predictor;
pub mod session;
pub mod settings;
pub mod smoother;
pub mod stats;
pub mod trilateration;
pub mod util;

pub use alarm::AlarmController;
pub use builder::SessionBuilder;
pub use config::{AlarmCfg, DetectionCfg, GeometryCfg, IngestCfg, SettingDefaults};
pub use detector::{Detector, TickOutcome};
pub use error::{BuildError, Result, SnifferError};
pub use hysteresis::{CONSECUTIVE_COUNTS, HysteresisGate};
pub use motion::{PositionHistory, StepVector};
pub use predictor::{Prediction, distance_to_origin_from_path, predict};
pub use session::DetectionSession;
pub use settings::{DetectionParams, LiveSettings};
pub use smoother::{NO_SIGNAL_CM, RangeSample, RangeSmoother};
pub use stats::StatsSnapshot;
pub use trilateration::{INVALID_POSITION, Position, locate};

pub use sniffer_traits::{CollisionState, StatusReport};
