use thiserror::Error;

/// Failure reported by the light sensor while the device is running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// A channel saturated. Shown as an overflow notice for that tick only.
    #[error("sensor overflow{}", overflow_suffix(.channel))]
    Overflow { channel: Option<usize> },
    #[error("sensor i/o error: {0}")]
    Io(String),
}

fn overflow_suffix(channel: &Option<usize>) -> String {
    channel.map(|c| format!(" on channel {c}")).unwrap_or_default()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorimeterError {
    #[error("unknown measurement: {0}")]
    UnknownMeasurement(String),
}

/// Ratio deviations need a finite, non-zero baseline absorbance.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeviationError {
    #[error("Baseline missing, zero, or infinite")]
    BaselineInvalid,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing light sensor")]
    MissingSensor,
    #[error("missing button pad")]
    MissingButtons,
    #[error("missing battery monitor")]
    MissingBattery,
    #[error("missing renderer")]
    MissingRenderer,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
