//! Fit evaluator: per-channel absorbance to concentration.

use std::collections::BTreeMap;

use colorimeter_traits::{CHANNEL_NAMES, Sample};

use crate::profile::{CalibrationProfile, ChannelFit};

/// Channel name to concentration. `None` marks a channel that has a
/// reading but no displayable value (zero slope, unsupported fit, out of
/// range).
pub type Concentrations = BTreeMap<String, Option<f64>>;

/// Pair each absorbance with its channel name.
pub fn absorbance_by_channel(absorbance: &Sample) -> BTreeMap<String, f64> {
    CHANNEL_NAMES
        .iter()
        .zip(absorbance.iter())
        .map(|(name, a)| ((*name).to_string(), *a))
        .collect()
}

/// Evaluate every channel fit of `profile` against the readings it has.
///
/// A profile without a `channels` map but with a top-level `channel`
/// applies its top-level fit and range to that one channel.
pub fn apply(profile: &CalibrationProfile, absorbance: &BTreeMap<String, f64>) -> Concentrations {
    let mut out = Concentrations::new();
    if profile.channels.is_empty() {
        if let Some(name) = profile.channel.and_then(|i| CHANNEL_NAMES.get(i)) {
            let fit = ChannelFit {
                fit: profile.fit.clone(),
                range: profile.range,
            };
            if let Some(a) = absorbance.get(*name) {
                out.insert((*name).to_string(), evaluate(&fit, *a));
            }
        }
        return out;
    }
    for (channel, fit) in &profile.channels {
        if let Some(a) = absorbance.get(channel) {
            out.insert(channel.clone(), evaluate(fit, *a));
        }
    }
    out
}

fn evaluate(fit: &ChannelFit, absorbance: f64) -> Option<f64> {
    let c = fit.fit.concentration(absorbance)?;
    match fit.range {
        Some(r) if !r.contains(c) => None,
        _ => Some(c),
    }
}
