//! Simulated sensor, button pad and battery backends.
//!
//! These stand in for the real drivers when running on a workstation and in
//! tests. They follow the driver contract: saturated channels surface as
//! `HwError::Overflow`, a missing sensor as `HwError::NotDetected`.
pub mod error;

use std::collections::VecDeque;

use colorimeter_traits::{
    BatteryMonitor, BoxError, ButtonPad, Buttons, CHANNEL_COUNT, Gain, LightSensor, Sample,
};
use tracing::trace;

use crate::error::{HwError, Result};

/// Largest count a channel can report before it saturates.
pub const FULL_SCALE_COUNTS: f64 = 65_535.0;

/// Simulated spectral sensor.
///
/// Counts are `light * gain`, multiplied by `transmission` once the first
/// `blank_reads` reads have been served. That mimics blanking on an empty
/// cuvette and then inserting a sample. Scripted readings, when queued, take
/// precedence over the synthetic ones.
pub struct SimulatedSensor {
    light: Sample,
    transmission: Sample,
    blank_reads: usize,
    reads: usize,
    gain: Gain,
    scripted: VecDeque<Result<Sample>>,
}

impl SimulatedSensor {
    /// Connect to the simulated sensor. `present = false` behaves like an
    /// empty socket.
    pub fn connect(present: bool) -> Result<Self> {
        if !present {
            return Err(HwError::NotDetected);
        }
        Ok(Self::new([100.0; CHANNEL_COUNT]))
    }

    pub fn new(light: Sample) -> Self {
        Self {
            light,
            transmission: [1.0; CHANNEL_COUNT],
            blank_reads: 0,
            reads: 0,
            gain: Gain::X1,
            scripted: VecDeque::new(),
        }
    }

    /// Attenuate every read after the first `blank_reads` by `transmission`.
    pub fn with_sample_after(mut self, blank_reads: usize, transmission: Sample) -> Self {
        self.blank_reads = blank_reads;
        self.transmission = transmission;
        self
    }

    /// Queue a reading (or a failure) to be returned verbatim.
    pub fn push_reading(&mut self, reading: Result<Sample>) {
        self.scripted.push_back(reading);
    }

    fn synthesize(&self) -> Result<Sample> {
        let mut out = [0.0; CHANNEL_COUNT];
        let attenuate = self.reads > self.blank_reads;
        for (ch, v) in out.iter_mut().enumerate() {
            let t = if attenuate { self.transmission[ch] } else { 1.0 };
            let counts = (self.light[ch] * self.gain.factor() * t).round();
            if counts >= FULL_SCALE_COUNTS {
                return Err(HwError::Overflow { channel: ch });
            }
            *v = counts.max(0.0);
        }
        Ok(out)
    }
}

impl LightSensor for SimulatedSensor {
    fn read_raw_channels(&mut self) -> std::result::Result<Sample, BoxError> {
        self.reads = self.reads.saturating_add(1);
        let reading = match self.scripted.pop_front() {
            Some(r) => r,
            None => self.synthesize(),
        };
        match reading {
            Ok(sample) => {
                trace!(reads = self.reads, gain = %self.gain, "simulated sensor read");
                Ok(sample)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    fn set_gain(&mut self, gain: Gain) -> std::result::Result<(), BoxError> {
        self.gain = gain;
        Ok(())
    }

    fn gain(&self) -> Gain {
        self.gain
    }
}

/// Button pad replaying a fixed script, one entry per poll.
///
/// Once the script runs out every poll reports no buttons.
#[derive(Debug, Default)]
pub struct ScriptedButtons {
    script: VecDeque<Buttons>,
}

impl ScriptedButtons {
    pub fn new(script: impl IntoIterator<Item = Buttons>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// One press per `every` polls, starting after `every` idle polls.
    pub fn spaced(presses: impl IntoIterator<Item = Buttons>, every: usize) -> Self {
        let gap = every.max(1);
        let mut script = VecDeque::new();
        for b in presses {
            script.extend(std::iter::repeat_n(Buttons::NONE, gap - 1));
            script.push_back(b);
        }
        Self { script }
    }
}

impl ButtonPad for ScriptedButtons {
    fn pressed(&mut self) -> Buttons {
        self.script.pop_front().unwrap_or(Buttons::NONE)
    }
}

/// Battery with a fixed terminal voltage, smoothed like the real monitor.
#[derive(Debug)]
pub struct SimulatedBattery {
    volts: f32,
    alpha: f32,
    lowpass: Option<f32>,
}

impl SimulatedBattery {
    pub fn new(volts: f32) -> Self {
        Self {
            volts,
            alpha: 0.1,
            lowpass: None,
        }
    }

    pub fn set_volts(&mut self, volts: f32) {
        self.volts = volts;
    }
}

impl BatteryMonitor for SimulatedBattery {
    fn update(&mut self) {
        // Seed with the first sample to avoid a slow climb from zero.
        let y = match self.lowpass {
            None => self.volts,
            Some(prev) => self.alpha * self.volts + (1.0 - self.alpha) * prev,
        };
        self.lowpass = Some(y);
    }

    fn voltage_lowpass(&self) -> f32 {
        self.lowpass.unwrap_or(self.volts)
    }
}
