use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("transport closed")]
    Closed,
    #[error("cannot resolve address: {0}")]
    Resolve(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
