//! `check` and `self-check`: offline validation without running the loop.

use std::path::Path;

use colorimeter_config::{Config, ConfigError, load_calibrations_file};
use colorimeter_core::hw_error::map_hw_error;
use colorimeter_core::validate_profiles;
use colorimeter_hardware::SimulatedSensor;
use colorimeter_traits::{CHANNEL_COUNT, LightSensor};
use eyre::{Result, WrapErr};
use serde_json::json;

use crate::cli::CliError;

/// Validate a calibration store and list every defect.
pub fn check_file(path: &Path, json_out: bool) -> Result<()> {
    let raw = load_calibrations_file(path)?;
    let v = validate_profiles(&raw, CHANNEL_COUNT);

    if json_out {
        let accepted: Vec<&String> = v.accepted.keys().collect();
        println!(
            "{}",
            json!({
                "file": path.display().to_string(),
                "accepted": accepted,
                "rejected": v.rejected,
            })
        );
    } else {
        for name in v.accepted.keys() {
            println!("ok    {name}");
        }
        for (name, defects) in &v.rejected {
            println!("FAIL  {name}");
            for d in defects {
                println!("      - {d}");
            }
        }
        println!(
            "{} accepted, {} rejected",
            v.accepted.len(),
            v.rejected.len()
        );
    }

    if v.is_clean() {
        Ok(())
    } else {
        Err(CliError::CalibrationDefects(v.rejected.len()).into())
    }
}

pub fn self_check(
    config: std::result::Result<Config, ConfigError>,
    calibrations: &Path,
) -> Result<()> {
    let config = config?;
    println!(
        "config OK (loop {} ms, {} blank samples)",
        config.timing.loop_ms, config.timing.blank_samples
    );

    let raw = load_calibrations_file(calibrations)?;
    let v = validate_profiles(&raw, CHANNEL_COUNT);
    println!(
        "calibrations OK ({} accepted, {} rejected)",
        v.accepted.len(),
        v.rejected.len()
    );

    let mut sensor = SimulatedSensor::connect(true).wrap_err("open sensor")?;
    if let Some(gain) = config.gain {
        sensor
            .set_gain(gain)
            .map_err(|e| map_hw_error(&*e))
            .wrap_err("set gain")?;
    }
    let sample = sensor.read_raw_channels().map_err(|e| map_hw_error(&*e))?;
    tracing::debug!(?sample, "self-check read");
    println!("sensor OK (gain {})", sensor.gain());
    Ok(())
}
