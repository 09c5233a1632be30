//! Deviation analyzer: measured absorbance ratios against expected ones.

use std::collections::BTreeMap;

use colorimeter_traits::CHANNEL_NAMES;

use crate::error::DeviationError;
use crate::util::round_to;

/// Channel every ratio is taken against.
pub const BASELINE_CHANNEL: &str = "590nm";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deviation {
    /// Percent deviation from the expected ratio, already rounded.
    Percent(f64),
    /// The measured ratio was not finite.
    NotAvailable,
}

/// Percent deviation of each channel's measured ratio from its expected
/// ratio, in fixed channel order. Channels without an expected ratio are
/// left out.
pub fn deviations(
    expected_ratios: &BTreeMap<String, f64>,
    absorbance: &[f64],
) -> Result<Vec<(&'static str, Deviation)>, DeviationError> {
    let baseline = CHANNEL_NAMES
        .iter()
        .zip(absorbance)
        .find(|(name, _)| **name == BASELINE_CHANNEL)
        .map(|(_, a)| *a)
        .filter(|b| *b != 0.0 && b.is_finite())
        .ok_or(DeviationError::BaselineInvalid)?;

    Ok(CHANNEL_NAMES
        .iter()
        .zip(absorbance)
        .filter_map(|(name, a)| {
            let expected = expected_ratios.get(*name)?;
            let measured = a / baseline;
            let dev = if measured.is_finite() {
                Deviation::Percent(round_deviation((measured - expected) / expected * 100.0))
            } else {
                Deviation::NotAvailable
            };
            Some((*name, dev))
        })
        .collect())
}

/// One decimal below 10 %, whole percent otherwise.
pub fn round_deviation(d: f64) -> f64 {
    if d.abs() < 10.0 {
        round_to(d, 1)
    } else {
        d.round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absorbances(baseline: f64) -> [f64; 10] {
        let mut a = [1.0; 10];
        a[5] = baseline;
        a
    }

    #[test]
    fn matching_ratio_is_zero() {
        let expected = BTreeMap::from([("415nm".to_string(), 1.2)]);
        let mut a = absorbances(2.0);
        a[0] = 2.4;
        let out = deviations(&expected, &a).unwrap();
        assert_eq!(out, vec![("415nm", Deviation::Percent(0.0))]);
    }

    #[test]
    fn large_deviations_round_to_whole_percent() {
        assert_eq!(round_deviation(12.46), 12.0);
        assert_eq!(round_deviation(-4.56), -4.6);
    }

    #[test]
    fn short_vector_has_no_baseline() {
        let expected = BTreeMap::from([("415nm".to_string(), 1.0)]);
        assert_eq!(
            deviations(&expected, &[1.0, 1.0]),
            Err(DeviationError::BaselineInvalid)
        );
    }
}
