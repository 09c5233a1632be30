//! Calibration record validator.
//!
//! Every check runs and accumulates; a profile with any defect is dropped
//! whole. Messages are meant for the device screen, so they start with the
//! profile name (or `<name>.<channel>` for nested channel fits).

use std::collections::BTreeMap;

use colorimeter_config::RawProfiles;
use serde_json::{Map, Value};

use crate::profile::{CalibrationProfile, ChannelFit, Fit, FitType, ValidRange};

/// Accepted profiles plus the defects of every rejected one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub accepted: BTreeMap<String, CalibrationProfile>,
    pub rejected: BTreeMap<String, Vec<String>>,
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

pub fn validate_profiles(raw: &RawProfiles, channel_count: usize) -> Validation {
    let mut out = Validation::default();
    for (name, value) in raw {
        match validate_profile(name, value, channel_count) {
            Ok(profile) => {
                out.accepted.insert(name.clone(), profile);
            }
            Err(defects) => {
                tracing::warn!(profile = %name, defects = defects.len(), "calibration rejected");
                out.rejected.insert(name.clone(), defects);
            }
        }
    }
    out
}

/// Check one raw profile. On success the typed profile is returned, else
/// the full list of defects in check order.
pub fn validate_profile(
    name: &str,
    value: &Value,
    channel_count: usize,
) -> Result<CalibrationProfile, Vec<String>> {
    let Some(obj) = value.as_object() else {
        return Err(vec![format!("{name} profile must be a record")]);
    };
    let mut errors = Vec::new();

    let fit_type = check_fit_type(name, obj.get("fit_type"), true, &mut errors);
    let coefficients = match coef_value(obj) {
        None => {
            errors.push(format!("{name} missing fit_coef"));
            None
        }
        Some(v) => check_coefficients(name, v, fit_type, &mut errors),
    };

    let range = match obj.get("range") {
        // A missing fit_type is reported once, without a range defect.
        None => {
            if obj.contains_key("fit_type") && fit_type != Some(FitType::Linear) {
                errors.push(format!("{name} range data missing"));
            }
            None
        }
        Some(v) => check_range(name, v, &mut errors),
    };

    let channel = obj
        .get("channel")
        .and_then(|v| check_channel(name, v, channel_count, &mut errors));

    let led = optional_text(name, obj, "led", &mut errors);
    let units = optional_text(name, obj, "units", &mut errors);
    let channels = obj
        .get("channels")
        .map(|v| check_channels(name, v, &mut errors))
        .unwrap_or_default();
    let expected_ratios = obj
        .get("expected_ratios")
        .map(|v| check_ratios(name, v, &mut errors))
        .unwrap_or_default();

    match (errors.is_empty(), fit_type, coefficients) {
        (true, Some(fit_type), Some(coefficients)) => Ok(CalibrationProfile {
            name: name.to_string(),
            fit: Fit::from_parts(fit_type, coefficients),
            range,
            channel,
            led,
            units,
            channels,
            expected_ratios,
        }),
        _ => Err(errors),
    }
}

fn coef_value(obj: &Map<String, Value>) -> Option<&Value> {
    obj.get("fit_coef").or_else(|| obj.get("fit_coefficients"))
}

/// `required` is false for nested channel fits, which default to linear.
fn check_fit_type(
    prefix: &str,
    value: Option<&Value>,
    required: bool,
    errors: &mut Vec<String>,
) -> Option<FitType> {
    match value {
        None if required => {
            errors.push(format!("{prefix} missing fit_type"));
            None
        }
        None => Some(FitType::Linear),
        Some(v) => {
            let parsed = v.as_str().and_then(FitType::parse);
            if parsed.is_none() {
                errors.push(format!("{prefix} unknown fit_type {}", display_value(v)));
            }
            parsed
        }
    }
}

fn check_coefficients(
    prefix: &str,
    value: &Value,
    fit_type: Option<FitType>,
    errors: &mut Vec<String>,
) -> Option<Vec<f64>> {
    let Some(coefficients) = numeric_vector(value) else {
        errors.push(format!("{prefix} fit coeff format incorrect"));
        return None;
    };
    if fit_type == Some(FitType::Linear) && coefficients.len() > 2 {
        errors.push(format!("{prefix} too many fit_coef for linear fit"));
    }
    Some(coefficients)
}

fn numeric_vector(value: &Value) -> Option<Vec<f64>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<_>>>()
}

fn check_range(prefix: &str, value: &Value, errors: &mut Vec<String>) -> Option<ValidRange> {
    let Some(obj) = value.as_object() else {
        errors.push(format!("{prefix} range data must be a record"));
        return None;
    };
    let min = range_bound(prefix, obj, "min", errors);
    let max = range_bound(prefix, obj, "max", errors);
    let (min, max) = (min?, max?);
    // Both bounds are finite, so this comparison is total.
    if min >= max {
        errors.push(format!("{prefix} range min >= max"));
        return None;
    }
    Some(ValidRange { min, max })
}

fn range_bound(
    prefix: &str,
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<f64> {
    let Some(v) = obj.get(key) else {
        errors.push(format!("{prefix} range {key} missing"));
        return None;
    };
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite());
    if parsed.is_none() {
        errors.push(format!("{prefix} range {key} not float"));
    }
    parsed
}

fn check_channel(
    prefix: &str,
    value: &Value,
    channel_count: usize,
    errors: &mut Vec<String>,
) -> Option<usize> {
    let index = value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < channel_count as f64)
        .map(|f| f as usize);
    if index.is_none() {
        errors.push(format!("{prefix} channel {} not allowed", display_value(value)));
    }
    index
}

fn optional_text(
    prefix: &str,
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(format!("{prefix} {key} must be a string"));
            None
        }
    }
}

fn check_channels(
    name: &str,
    value: &Value,
    errors: &mut Vec<String>,
) -> BTreeMap<String, ChannelFit> {
    let mut out = BTreeMap::new();
    let Some(obj) = value.as_object() else {
        errors.push(format!("{name} channels must be a record"));
        return out;
    };
    for (channel, spec) in obj {
        let prefix = format!("{name}.{channel}");
        let Some(spec) = spec.as_object() else {
            errors.push(format!("{prefix} channel fit must be a record"));
            continue;
        };
        let fit_type = check_fit_type(&prefix, spec.get("fit_type"), false, errors);
        let coefficients = match coef_value(spec) {
            None => Some(vec![1.0, 0.0]),
            Some(v) => check_coefficients(&prefix, v, fit_type, errors),
        };
        let range = spec
            .get("range")
            .and_then(|v| check_range(&prefix, v, errors));
        if let (Some(fit_type), Some(coefficients)) = (fit_type, coefficients) {
            out.insert(
                channel.clone(),
                ChannelFit {
                    fit: Fit::from_parts(fit_type, coefficients),
                    range,
                },
            );
        }
    }
    out
}

fn check_ratios(name: &str, value: &Value, errors: &mut Vec<String>) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    let Some(obj) = value.as_object() else {
        errors.push(format!("{name} expected_ratios must be a record"));
        return out;
    };
    for (channel, ratio) in obj {
        match ratio.as_f64() {
            Some(r) if r != 0.0 && r.is_finite() => {
                out.insert(channel.clone(), r);
            }
            _ => errors.push(format!(
                "{name} expected ratio for {channel} must be a non-zero number"
            )),
        }
    }
    out
}

/// Strings are shown bare, everything else as JSON.
fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(v: Value) -> Result<CalibrationProfile, Vec<String>> {
        validate_profile("P", &v, 10)
    }

    #[test]
    fn minimal_linear_profile_is_accepted() {
        let p = check(json!({"fit_type": "linear", "fit_coef": [2.0, 1.0]})).unwrap();
        assert_eq!(
            p.fit,
            Fit::Linear {
                slope: 2.0,
                intercept: 1.0
            }
        );
        assert!(p.range.is_none());
    }

    #[test]
    fn alias_key_for_coefficients() {
        assert!(check(json!({"fit_type": "linear", "fit_coefficients": [1]})).is_ok());
    }

    #[test]
    fn non_string_fit_type_is_shown_as_json() {
        let errs = check(json!({"fit_type": 3, "fit_coef": [1], "range": {"min": 0, "max": 1}}))
            .unwrap_err();
        assert_eq!(errs, vec!["P unknown fit_type 3"]);
    }

    #[test]
    fn both_range_bounds_report_independently() {
        let errs = check(json!({
            "fit_type": "linear", "fit_coef": [1], "range": {"max": "abc"}
        }))
        .unwrap_err();
        assert_eq!(errs, vec!["P range min missing", "P range max not float"]);
    }

    #[test]
    fn numeric_strings_are_floats() {
        let p = check(json!({
            "fit_type": "linear", "fit_coef": [1], "range": {"min": "0.5", "max": 2}
        }))
        .unwrap();
        assert_eq!(p.range, Some(ValidRange { min: 0.5, max: 2.0 }));
    }

    #[test]
    fn non_record_profile() {
        assert_eq!(check(json!([1, 2])).unwrap_err(), vec!["P profile must be a record"]);
    }
}
