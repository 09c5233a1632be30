//! Measurement pipeline: raw counts to transmittance, absorbance and the
//! per-measurement values shown on screen.

use colorimeter_traits::{CHANNEL_COUNT, Sample};

use crate::blank::BlankReference;
use crate::calibrations::Calibrations;
use crate::deviation::Deviation;
use crate::error::DeviationError;
use crate::fit::Concentrations;

pub const ABSORBANCE: &str = "Absorbance";
pub const TRANSMITTANCE: &str = "Transmittance";
pub const RAW_SENSOR: &str = "Raw Sensor";

/// Built-in measurements, in menu order.
pub const DEFAULT_MEASUREMENTS: [&str; 3] = [ABSORBANCE, TRANSMITTANCE, RAW_SENSOR];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasurementKind {
    Absorbance,
    Transmittance,
    RawSensor,
    /// A calibration profile, by name.
    Calibrated(String),
}

impl MeasurementKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            ABSORBANCE => Self::Absorbance,
            TRANSMITTANCE => Self::Transmittance,
            RAW_SENSOR => Self::RawSensor,
            other => Self::Calibrated(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Absorbance => ABSORBANCE,
            Self::Transmittance => TRANSMITTANCE,
            Self::RawSensor => RAW_SENSOR,
            Self::Calibrated(name) => name,
        }
    }

    pub fn is_raw_sensor(&self) -> bool {
        matches!(self, Self::RawSensor)
    }
}

/// What a single tick shows.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementValues {
    Channels(Sample),
    Concentrations(Concentrations),
    Deviations(Result<Vec<(&'static str, Deviation)>, DeviationError>),
}

/// `raw / blank`, clamped above at 1.0.
pub fn transmittances(raw: &Sample, blank: &BlankReference) -> Sample {
    let mut out = [0.0; CHANNEL_COUNT];
    for ((t, r), b) in out.iter_mut().zip(raw).zip(blank.values()) {
        let v = r / b;
        *t = if v > 1.0 { 1.0 } else { v };
    }
    out
}

/// `-log10(transmittance)`, clamped below at 0.0.
pub fn absorbances(transmittance: &Sample) -> Sample {
    let mut out = [0.0; CHANNEL_COUNT];
    for (a, t) in out.iter_mut().zip(transmittance) {
        let v = -t.log10();
        *a = if v <= 0.0 { 0.0 } else { v };
    }
    out
}

/// Derive the values for `kind` from one raw sample.
///
/// The profile named by `deviation_profile` is routed to the deviation
/// analyzer instead of its fits.
pub fn measurement_values(
    kind: &MeasurementKind,
    raw: &Sample,
    blank: &BlankReference,
    calibrations: &Calibrations,
    deviation_profile: Option<&str>,
) -> MeasurementValues {
    match kind {
        MeasurementKind::RawSensor => MeasurementValues::Channels(*raw),
        MeasurementKind::Transmittance => MeasurementValues::Channels(transmittances(raw, blank)),
        MeasurementKind::Absorbance => {
            MeasurementValues::Channels(absorbances(&transmittances(raw, blank)))
        }
        MeasurementKind::Calibrated(name) => {
            let a = absorbances(&transmittances(raw, blank));
            if deviation_profile == Some(name.as_str()) {
                let result = calibrations
                    .deviations(name, &a)
                    .unwrap_or(Err(DeviationError::BaselineInvalid));
                MeasurementValues::Deviations(result)
            } else {
                MeasurementValues::Concentrations(calibrations.apply(name, &a).unwrap_or_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_light_is_about_0_301_absorbance() {
        let blank = BlankReference::new([100.0; CHANNEL_COUNT]);
        let t = transmittances(&[50.0; CHANNEL_COUNT], &blank);
        assert!(t.iter().all(|v| (*v - 0.5).abs() < 1e-12));
        let a = absorbances(&t);
        assert!(a.iter().all(|v| (*v - 0.30103).abs() < 1e-5));
    }

    #[test]
    fn brighter_than_blank_clamps() {
        let blank = BlankReference::new([10.0; CHANNEL_COUNT]);
        let t = transmittances(&[20.0; CHANNEL_COUNT], &blank);
        assert_eq!(t, [1.0; CHANNEL_COUNT]);
        let a = absorbances(&t);
        assert!(a.iter().all(|v| *v == 0.0 && v.is_sign_positive()));
    }

    #[test]
    fn names_round_trip_through_kind() {
        for name in DEFAULT_MEASUREMENTS {
            assert_eq!(MeasurementKind::from_name(name).name(), name);
        }
        assert_eq!(
            MeasurementKind::from_name("Nitrate"),
            MeasurementKind::Calibrated("Nitrate".into())
        );
    }
}
