//! Validated calibration store with its queue of rejected profiles.

use std::collections::{BTreeMap, VecDeque};

use colorimeter_config::RawProfiles;
use colorimeter_traits::{CHANNEL_COUNT, CHANNEL_NAMES, Sample};

use crate::deviation::{self, Deviation};
use crate::error::DeviationError;
use crate::fit::{self, Concentrations};
use crate::profile::CalibrationProfile;
use crate::validate::validate_profiles;

#[derive(Debug, Clone, Default)]
pub struct Calibrations {
    profiles: BTreeMap<String, CalibrationProfile>,
    errors: VecDeque<(String, Vec<String>)>,
}

impl Calibrations {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate `raw`, keeping accepted profiles and queueing the defects of
    /// rejected ones in name order.
    pub fn from_raw(raw: &RawProfiles) -> Self {
        let v = validate_profiles(raw, CHANNEL_COUNT);
        Self {
            profiles: v.accepted,
            errors: v.rejected.into_iter().collect(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Next rejected profile's defects, one per line.
    pub fn pop_error(&mut self) -> Option<String> {
        self.errors.pop_front().map(|(_, defects)| defects.join("\n"))
    }

    /// Accepted profile names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CalibrationProfile> {
        self.profiles.get(name)
    }

    pub fn led(&self, name: &str) -> Option<&str> {
        self.get(name)?.led.as_deref()
    }

    pub fn units(&self, name: &str) -> Option<&str> {
        self.get(name)?.units.as_deref()
    }

    /// Channel name the profile is meant for, if it names one.
    pub fn channel(&self, name: &str) -> Option<&'static str> {
        let index = self.get(name)?.channel?;
        CHANNEL_NAMES.get(index).copied()
    }

    pub fn apply(&self, name: &str, absorbance: &Sample) -> Option<Concentrations> {
        let profile = self.get(name)?;
        Some(fit::apply(profile, &fit::absorbance_by_channel(absorbance)))
    }

    pub fn deviations(
        &self,
        name: &str,
        absorbance: &Sample,
    ) -> Option<Result<Vec<(&'static str, Deviation)>, DeviationError>> {
        let profile = self.get(name)?;
        Some(deviation::deviations(&profile.expected_ratios, absorbance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: serde_json::Value) -> RawProfiles {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn rejected_profiles_queue_in_name_order() {
        let mut c = Calibrations::from_raw(&raw(json!({
            "Zinc": {"fit_coef": [1]},
            "Alpha": {"fit_type": "linear", "fit_coef": [1, 2, 3]},
            "Good": {"fit_type": "linear", "fit_coef": [1], "led": "red", "channel": 6}
        })));
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["Good"]);
        assert_eq!(c.error_count(), 2);
        assert_eq!(
            c.pop_error().as_deref(),
            Some("Alpha too many fit_coef for linear fit")
        );
        assert_eq!(c.pop_error().as_deref(), Some("Zinc missing fit_type"));
        assert!(!c.has_errors());
        assert_eq!(c.led("Good"), Some("red"));
        assert_eq!(c.channel("Good"), Some("630nm"));
    }
}
