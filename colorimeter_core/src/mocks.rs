//! Test and helper mocks for colorimeter_core

use colorimeter_traits::{BoxError, Gain, LightSensor, Sample};
use colorimeter_ui::{Renderer, View};

/// A sensor whose every read fails with the given message.
pub struct FailingSensor {
    pub message: &'static str,
    gain: Gain,
}

impl FailingSensor {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            gain: Gain::default(),
        }
    }
}

impl LightSensor for FailingSensor {
    fn read_raw_channels(&mut self) -> Result<Sample, BoxError> {
        Err(Box::new(std::io::Error::other(self.message)))
    }

    fn set_gain(&mut self, gain: Gain) -> Result<(), BoxError> {
        self.gain = gain;
        Ok(())
    }

    fn gain(&self) -> Gain {
        self.gain
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: View<'_>) {}
}
