use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SnifferError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("transport disconnected")]
    Disconnected,
    #[error(
        "invalid geometry: r1={r1_cm:.2}cm r2={r2_cm:.2}cm cannot be placed with baseline {baseline_m:.2}m"
    )]
    InvalidGeometry {
        r1_cm: f64,
        r2_cm: f64,
        baseline_m: f64,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing status display")]
    MissingDisplay,
    #[error("missing tone emitter")]
    MissingTone,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
