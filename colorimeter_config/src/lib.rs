#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Device configuration and calibration store loading.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - The calibration store is a JSON object of profile name to profile data.
//!   It is handed to the engine untyped; structural checks happen there.
use std::path::{Path, PathBuf};

use colorimeter_traits::Gain;
use serde::Deserialize;
use serde::de::{self, Deserializer};
use thiserror::Error;

/// Upper bound on samples per blanking pass.
pub const MAX_BLANK_SAMPLES: usize = 10_000;

/// Untyped calibration store: profile name to raw profile data.
pub type RawProfiles = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read configuration {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CalibrationsError {
    #[error("unable to read calibrations {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("calibrations json error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("calibrations must be a json object of name to profile")]
    NotAnObject,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Main loop pacing sleep (ms).
    pub loop_ms: u64,
    /// Minimum time between accepted button presses (ms).
    pub debounce_ms: u64,
    /// Samples taken per blanking pass.
    pub blank_samples: usize,
    /// Sleep between blanking samples (ms).
    pub blank_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            loop_ms: 100,
            debounce_ms: 600,
            blank_samples: 50,
            blank_interval_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    /// Menu rows visible at once
    pub items_per_screen: usize,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            items_per_screen: 6,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Measurement selected at power-up. Falls back to the first menu item
    /// when absent or unknown.
    #[serde(alias = "startup_measurement_name")]
    pub startup: Option<String>,
    /// Sensor gain applied at power-up.
    #[serde(deserialize_with = "de_gain")]
    pub gain: Option<Gain>,
    /// Digits after the decimal point for rendered values.
    #[serde(alias = "display_precision")]
    pub precision: u8,
    /// Profile whose readings are shown as ratio deviations instead of
    /// fitted concentrations.
    pub deviation_profile: Option<String>,
    pub timing: Timing,
    pub display: DisplayCfg,
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            startup: None,
            gain: None,
            precision: 2,
            deviation_profile: None,
            timing: Timing::default(),
            display: DisplayCfg::default(),
            logging: Logging::default(),
        }
    }
}

fn de_gain<'de, D>(deserializer: D) -> Result<Option<Gain>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) => s.parse::<Gain>().map(Some).map_err(de::Error::custom),
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a configuration file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = load_toml(&text)?;
    cfg.validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    Ok(cfg)
}

/// Parse a calibration store from JSON text.
pub fn parse_calibrations(s: &str) -> Result<RawProfiles, CalibrationsError> {
    match serde_json::from_str::<serde_json::Value>(s)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(CalibrationsError::NotAnObject),
    }
}

pub fn load_calibrations_file(path: &Path) -> Result<RawProfiles, CalibrationsError> {
    let text = std::fs::read_to_string(path).map_err(|source| CalibrationsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_calibrations(&text)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.precision > 10 {
            eyre::bail!("precision must be in [0, 10]");
        }
        if let Some(name) = &self.startup
            && name.trim().is_empty()
        {
            eyre::bail!("startup must not be empty when set");
        }

        // Timing
        if self.timing.loop_ms == 0 {
            eyre::bail!("timing.loop_ms must be >= 1");
        }
        if self.timing.debounce_ms == 0 {
            eyre::bail!("timing.debounce_ms must be >= 1");
        }
        if self.timing.blank_samples == 0 {
            eyre::bail!("timing.blank_samples must be >= 1");
        }
        if self.timing.blank_samples > MAX_BLANK_SAMPLES {
            eyre::bail!("timing.blank_samples must be <= {MAX_BLANK_SAMPLES}");
        }
        if self.timing.blank_interval_ms > 10_000 {
            eyre::bail!("timing.blank_interval_ms is unreasonably large (>10s)");
        }

        // Display
        if self.display.items_per_screen == 0 {
            eyre::bail!("display.items_per_screen must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
