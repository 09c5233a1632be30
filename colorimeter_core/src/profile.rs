//! Typed calibration profiles, produced only by the validator.

use std::collections::BTreeMap;

pub const FIT_LINEAR: &str = "linear";
pub const FIT_POLYNOMIAL: &str = "polynomial";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitType {
    Linear,
    Polynomial,
}

impl FitType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            FIT_LINEAR => Some(Self::Linear),
            FIT_POLYNOMIAL => Some(Self::Polynomial),
            _ => None,
        }
    }
}

/// Absorbance/concentration relation: `absorbance = slope * c + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fit {
    Linear { slope: f64, intercept: f64 },
    /// Accepted by validation, never evaluated.
    Polynomial { coefficients: Vec<f64> },
}

impl Default for Fit {
    fn default() -> Self {
        Self::Linear {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl Fit {
    /// Build a fit from already validated parts.
    ///
    /// Linear fits take `[slope, intercept]`; a lone coefficient is a slope
    /// through the origin and an empty list is the identity.
    pub fn from_parts(fit_type: FitType, coefficients: Vec<f64>) -> Self {
        match fit_type {
            FitType::Linear => match coefficients.as_slice() {
                [] => Self::default(),
                [slope] => Self::Linear {
                    slope: *slope,
                    intercept: 0.0,
                },
                [slope, intercept, ..] => Self::Linear {
                    slope: *slope,
                    intercept: *intercept,
                },
            },
            FitType::Polynomial => Self::Polynomial { coefficients },
        }
    }

    /// Concentration for an absorbance. `None` when the fit cannot be
    /// inverted or the result is not finite.
    pub fn concentration(&self, absorbance: f64) -> Option<f64> {
        match self {
            Self::Linear { slope, intercept } => {
                if *slope == 0.0 {
                    return None;
                }
                let c = (absorbance - intercept) / slope;
                c.is_finite().then_some(c)
            }
            Self::Polynomial { .. } => None,
        }
    }
}

/// Inclusive concentration bounds outside which a result is suppressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Fit for one named channel of a multi-channel profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelFit {
    pub fit: Fit,
    pub range: Option<ValidRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationProfile {
    pub name: String,
    pub fit: Fit,
    pub range: Option<ValidRange>,
    /// Sensor channel index the profile is meant for.
    pub channel: Option<usize>,
    pub led: Option<String>,
    pub units: Option<String>,
    /// Per-channel fits keyed by channel name.
    pub channels: BTreeMap<String, ChannelFit>,
    /// Expected absorbance ratios relative to the baseline channel.
    pub expected_ratios: BTreeMap<String, f64>,
}

impl CalibrationProfile {
    pub fn new(name: impl Into<String>, fit: Fit) -> Self {
        Self {
            name: name.into(),
            fit,
            range: None,
            channel: None,
            led: None,
            units: None,
            channels: BTreeMap::new(),
            expected_ratios: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_parts() {
        assert_eq!(
            Fit::from_parts(FitType::Linear, vec![2.0, 0.1]),
            Fit::Linear {
                slope: 2.0,
                intercept: 0.1
            }
        );
        assert_eq!(
            Fit::from_parts(FitType::Linear, vec![3.0]),
            Fit::Linear {
                slope: 3.0,
                intercept: 0.0
            }
        );
        assert_eq!(Fit::from_parts(FitType::Linear, vec![]), Fit::default());
    }

    #[test]
    fn zero_slope_has_no_concentration() {
        let fit = Fit::Linear {
            slope: 0.0,
            intercept: 0.0,
        };
        assert_eq!(fit.concentration(0.5), None);
    }

    #[test]
    fn range_is_inclusive() {
        let r = ValidRange { min: 0.0, max: 1.0 };
        assert!(r.contains(0.0));
        assert!(r.contains(1.0));
        assert!(!r.contains(1.000_001));
    }
}
