//! Human-readable error descriptions and structured JSON error formatting.

use colorimeter_config::{CalibrationsError, ConfigError};
use colorimeter_core::error::{BuildError, ColorimeterError, SensorError};

use crate::cli::CliError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(ce) = err.downcast_ref::<CliError>() {
        return match ce {
            CliError::DeviceAborted(msg) => format!(
                "What happened: The device stopped in abort mode ({msg}).\nLikely causes: The light sensor is missing or did not answer at power-up.\nHow to fix: Check the sensor connection, then restart."
            ),
            CliError::CalibrationDefects(n) => format!(
                "What happened: {n} calibration profile(s) were rejected.\nLikely causes: Missing fields, unknown fit types or out-of-range channels in the calibration store.\nHow to fix: Fix the defects listed above; rejected profiles never reach the menu."
            ),
            CliError::BadTransmission(t) => format!(
                "What happened: Transmission {t} is outside [0, 1].\nLikely causes: A percentage was passed instead of a fraction.\nHow to fix: Pass a fraction, e.g. `--transmission 0.5`."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: {be}.\nLikely causes: A peripheral was not wired into the builder.\nHow to fix: This is a wiring bug in the caller; report it with --log-level=debug output."
        );
    }

    if let Some(ce) = err.downcast_ref::<ConfigError>() {
        return match ce {
            ConfigError::Read { path, .. } => format!(
                "What happened: Could not read the configuration file {}.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config with an existing TOML file (see etc/colorimeter.toml).",
                path.display()
            ),
            ConfigError::Parse(e) => format!(
                "What happened: The configuration file is not valid TOML ({e}).\nLikely causes: A typo or an unknown key.\nHow to fix: Edit the TOML config and try again."
            ),
            ConfigError::Invalid(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<CalibrationsError>() {
        return match ce {
            CalibrationsError::Read { path, .. } => format!(
                "What happened: Could not read the calibration store {}.\nLikely causes: Wrong --calibrations path.\nHow to fix: Pass --calibrations (or a file argument) pointing at a JSON store.",
                path.display()
            ),
            CalibrationsError::Parse(e) => format!(
                "What happened: The calibration store is not valid JSON ({e}).\nLikely causes: A trailing comma or unquoted key.\nHow to fix: Run the file through a JSON linter and fix the reported line."
            ),
            CalibrationsError::NotAnObject => "What happened: The calibration store is not a JSON object.\nLikely causes: The file holds a list or a single profile.\nHow to fix: Wrap profiles in an object keyed by profile name.".to_string(),
        };
    }

    if let Some(ColorimeterError::UnknownMeasurement(name)) =
        err.downcast_ref::<ColorimeterError>()
    {
        return format!(
            "What happened: No measurement named '{name}'.\nLikely causes: The profile was rejected or the name is misspelled.\nHow to fix: Run `colorimeter check` to list accepted profiles."
        );
    }

    if let Some(se) = err.downcast_ref::<SensorError>() {
        return match se {
            SensorError::Overflow { .. } => "What happened: The light sensor overflowed.\nLikely causes: Too much light for the current gain.\nHow to fix: Lower the gain in the config.".to_string(),
            SensorError::Io(msg) => format!(
                "What happened: The light sensor did not respond ({msg}).\nLikely causes: Loose wiring or no power to the sensor board.\nHow to fix: Check the sensor connection, then rerun."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable process exit codes.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<CliError>() {
        Some(CliError::DeviceAborted(_)) => 3,
        Some(CliError::CalibrationDefects(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<CliError>() {
        Some(CliError::DeviceAborted(_)) => "DeviceAborted",
        Some(CliError::CalibrationDefects(_)) => "CalibrationDefects",
        Some(CliError::BadTransmission(_)) => "BadArgument",
        None if err.downcast_ref::<ConfigError>().is_some() => "Config",
        None if err.downcast_ref::<CalibrationsError>().is_some() => "Calibrations",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
