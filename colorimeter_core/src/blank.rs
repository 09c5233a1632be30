//! Blank reference and the blanking procedure.

use std::time::Duration;

use colorimeter_config::MAX_BLANK_SAMPLES;
use colorimeter_traits::{CHANNEL_COUNT, Clock, LightSensor, Sample};
use tracing::{debug, warn};

use crate::hw_error::map_hw_error;
use crate::util::median_in_place;

/// Per-channel reference intensity. Starts as all ones and is only ever
/// replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlankReference {
    values: Sample,
}

impl Default for BlankReference {
    fn default() -> Self {
        Self {
            values: [1.0; CHANNEL_COUNT],
        }
    }
}

impl BlankReference {
    /// Non-positive (and NaN) entries become 1.0.
    pub fn new(mut values: Sample) -> Self {
        for v in &mut values {
            if v.is_nan() || *v <= 0.0 {
                *v = 1.0;
            }
        }
        Self { values }
    }

    pub fn values(&self) -> &Sample {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankingCfg {
    pub samples: usize,
    pub interval: Duration,
}

impl Default for BlankingCfg {
    fn default() -> Self {
        Self {
            samples: 50,
            interval: Duration::from_millis(50),
        }
    }
}

/// Take `cfg.samples` readings `cfg.interval` apart and reduce them to a
/// per-channel median. Blocks until done. A failed read contributes a row
/// of ones.
pub fn blank_sensor<S, C>(sensor: &mut S, clock: &C, cfg: &BlankingCfg) -> BlankReference
where
    S: LightSensor + ?Sized,
    C: Clock + ?Sized,
{
    if cfg.samples == 0 {
        return BlankReference::default();
    }
    let mut rows: Vec<Sample> = Vec::with_capacity(cfg.samples.min(MAX_BLANK_SAMPLES));
    for i in 0..cfg.samples {
        match sensor.read_raw_channels() {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(sample = i, error = %map_hw_error(&*e), "blanking read failed");
                rows.push([1.0; CHANNEL_COUNT]);
            }
        }
        clock.sleep(cfg.interval);
    }

    let mut medians = [1.0; CHANNEL_COUNT];
    let mut column = Vec::with_capacity(rows.len());
    for (ch, m) in medians.iter_mut().enumerate() {
        column.clear();
        column.extend(rows.iter().map(|r| r[ch]));
        if let Some(v) = median_in_place(&mut column) {
            *m = v;
        }
    }
    let blank = BlankReference::new(medians);
    debug!(samples = cfg.samples, blank = ?blank.values(), "blanking done");
    blank
}
