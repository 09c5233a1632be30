//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use colorimeter_traits::Buttons;
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Failures the CLI itself decides on (the device never exits on its own).
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("device aborted: {0}")]
    DeviceAborted(String),
    #[error("{0} calibration profile(s) rejected")]
    CalibrationDefects(usize),
    #[error("--transmission must be within [0, 1], got {0}")]
    BadTransmission(f64),
}

#[derive(Parser, Debug)]
#[command(name = "colorimeter", version, about = "Colorimeter firmware CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/colorimeter.toml")]
    pub config: PathBuf,

    /// Calibration store (JSON object of name to profile)
    #[arg(long, value_name = "FILE", default_value = "etc/calibrations.json")]
    pub calibrations: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the device loop against the simulated sensor
    Run {
        /// Stop after this many loop ticks (default: run until Ctrl-C)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Scripted button press; repeat for a sequence. Combine buttons with '+'
        /// (e.g. `--press menu --press down --press right`)
        #[arg(long = "press", value_name = "BUTTONS", value_parser = parse_press)]
        presses: Vec<Buttons>,
        /// Loop ticks between scripted presses
        #[arg(long, value_name = "TICKS", default_value_t = 8)]
        press_every: usize,
        /// Simulated light level in counts at 1x gain
        #[arg(long, value_name = "COUNTS", default_value_t = 1000.0)]
        light: f64,
        /// Sample transmission seen after the initial blanking pass (0..=1)
        #[arg(long, value_name = "FRACTION")]
        transmission: Option<f64>,
        /// Select a measurement by name before the loop starts
        #[arg(long, value_name = "NAME")]
        measurement: Option<String>,
        /// Simulate an empty sensor socket
        #[arg(long, action = ArgAction::SetTrue)]
        no_sensor: bool,
        /// Print every frame, not just the ones that changed
        #[arg(long, action = ArgAction::SetTrue)]
        all_frames: bool,
    },
    /// Validate a calibration store and report every defect
    Check {
        /// File to check (defaults to --calibrations)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Quick health check (config, calibrations, sensor)
    SelfCheck,
}

/// Parse `menu`, `blank+menu`, ... into a button mask.
pub fn parse_press(s: &str) -> Result<Buttons, String> {
    let mut mask = Buttons::NONE;
    for part in s.split('+') {
        mask |= part.parse::<Buttons>()?;
    }
    if mask.is_empty() {
        return Err(format!("no buttons in '{s}'"));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn presses_combine() {
        assert_eq!(parse_press("menu").unwrap(), Buttons::MENU);
        assert_eq!(
            parse_press("blank+menu").unwrap(),
            Buttons::BLANK | Buttons::MENU
        );
        assert!(parse_press("none").is_err());
        assert!(parse_press("sideways").is_err());
    }
}
