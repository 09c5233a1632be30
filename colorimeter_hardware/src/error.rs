use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("sensor overflow on channel {channel}")]
    Overflow { channel: usize },
    #[error("sensor not detected")]
    NotDetected,
    #[error("sensor i/o error: {0}")]
    Bus(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
