//! Builder for [`Colorimeter`].
//!
//! Peripherals are required. Configuration and calibrations are taken as
//! load *results*: a failed load is not a build error, it becomes a startup
//! message on the device.

use colorimeter_config::{CalibrationsError, Config, ConfigError, RawProfiles};
use colorimeter_traits::clock::{Clock, MonotonicClock};
use colorimeter_traits::{BatteryMonitor, BoxError, ButtonPad, LightSensor};
use colorimeter_ui::Renderer;

use crate::engine::{Colorimeter, Parts};
use crate::error::{BuildError, Result};

#[derive(Default)]
pub struct ColorimeterBuilder {
    sensor: Option<std::result::Result<Box<dyn LightSensor>, BoxError>>,
    buttons: Option<Box<dyn ButtonPad>>,
    battery: Option<Box<dyn BatteryMonitor>>,
    renderer: Option<Box<dyn Renderer>>,
    clock: Option<Box<dyn Clock>>,
    config: Option<std::result::Result<Config, ConfigError>>,
    calibrations: Option<std::result::Result<RawProfiles, CalibrationsError>>,
    version: Option<String>,
}

impl ColorimeterBuilder {
    pub fn with_sensor(mut self, sensor: impl LightSensor + 'static) -> Self {
        self.sensor = Some(Ok(Box::new(sensor)));
        self
    }

    /// Sensor initialization outcome. A failure puts the device in abort
    /// mode at startup.
    pub fn with_sensor_result<S, E>(mut self, sensor: std::result::Result<S, E>) -> Self
    where
        S: LightSensor + 'static,
        E: Into<BoxError>,
    {
        self.sensor = Some(match sensor {
            Ok(s) => Ok(Box::new(s)),
            Err(e) => Err(e.into()),
        });
        self
    }

    pub fn with_buttons(mut self, buttons: impl ButtonPad + 'static) -> Self {
        self.buttons = Some(Box::new(buttons));
        self
    }

    pub fn with_battery(mut self, battery: impl BatteryMonitor + 'static) -> Self {
        self.battery = Some(Box::new(battery));
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Defaults to [`MonotonicClock`].
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_config(self, config: Config) -> Self {
        self.with_config_result(Ok(config))
    }

    pub fn with_config_result(mut self, config: std::result::Result<Config, ConfigError>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_calibrations(self, raw: RawProfiles) -> Self {
        self.with_calibrations_result(Ok(raw))
    }

    pub fn with_calibrations_result(
        mut self,
        raw: std::result::Result<RawProfiles, CalibrationsError>,
    ) -> Self {
        self.calibrations = Some(raw);
        self
    }

    /// Firmware version shown by the About entry.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Check the required parts, then run startup (which includes the
    /// initial blanking pass).
    pub fn build(self) -> Result<Colorimeter> {
        let sensor = self.sensor.ok_or(BuildError::MissingSensor)?;
        let buttons = self.buttons.ok_or(BuildError::MissingButtons)?;
        let battery = self.battery.ok_or(BuildError::MissingBattery)?;
        let renderer = self.renderer.ok_or(BuildError::MissingRenderer)?;
        Ok(Colorimeter::start(Parts {
            sensor,
            buttons,
            battery,
            renderer,
            clock: self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
            config: self.config.unwrap_or_else(|| Ok(Config::default())),
            calibrations: self
                .calibrations
                .unwrap_or_else(|| Ok(RawProfiles::new())),
            version: self
                .version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        }))
    }
}
