//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "sniffer",
    version,
    about = "Two-sensor collision warning monitor"
)]
pub struct Cli {
    /// Path to config TOML (optional; built-in defaults otherwise)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print status and errors as JSON lines; logs become JSON too
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Where range payloads come from. Exactly one is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Read payloads from a TCP endpoint (e.g. a serial bridge), HOST:PORT
    #[arg(long, value_name = "ADDR")]
    pub connect: Option<String>,
    /// Read payloads from a character device such as /dev/rfcomm0
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,
    /// Simulate an object approaching the sensors ([sim] in the config)
    #[arg(long, action = ArgAction::SetTrue)]
    pub sim: bool,
    /// Replay a recording CSV with headers r1_cm,r2_cm
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor ranges and warn about predicted collisions
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Default sensor baseline w in meters (live `w` edits override it)
        #[arg(long, value_name = "M")]
        baseline: Option<f64>,
        /// Default safety radius r in meters
        #[arg(long, value_name = "M")]
        radius: Option<f64>,
        /// Default prediction horizon t in seconds
        #[arg(long, value_name = "S")]
        horizon: Option<f64>,
        /// Stop automatically after this many milliseconds
        #[arg(long, value_name = "MS")]
        duration_ms: Option<u64>,
        /// Count alarm tones instead of ringing the terminal bell
        #[arg(long, action = ArgAction::SetTrue)]
        mute: bool,
        /// Ignore stdin (no interactive commands)
        #[arg(long, action = ArgAction::SetTrue)]
        no_stdin: bool,
        /// Print session counters on exit
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Trilaterate a single pair of ranges
    Locate {
        /// Sensor 1 range in centimeters
        #[arg(long)]
        r1: f64,
        /// Sensor 2 range in centimeters
        #[arg(long)]
        r2: f64,
        /// Baseline in meters (defaults to [geometry] baseline_m)
        #[arg(long, value_name = "M")]
        baseline: Option<f64>,
    },
    /// Validate the configuration and print the effective settings
    SelfCheck,
}
