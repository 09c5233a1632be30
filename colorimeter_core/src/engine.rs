//! The device loop: startup, button handling, measurement and display.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colorimeter_config::{CalibrationsError, Config, ConfigError, RawProfiles};
use colorimeter_traits::clock::Clock;
use colorimeter_traits::{BatteryMonitor, BoxError, ButtonPad, CHANNEL_NAMES, Gain, LightSensor};
use colorimeter_ui::{
    MeasureScreen, MenuScreen, MessageKind, MessageScreen, Reading, Renderer, ValueLine, View,
};
use tracing::{debug, error, info, trace, warn};

use crate::blank::{BlankReference, BlankingCfg, blank_sensor};
use crate::builder::ColorimeterBuilder;
use crate::calibrations::Calibrations;
use crate::debounce::Debouncer;
use crate::deviation::Deviation;
use crate::error::{ColorimeterError, Result, SensorError};
use crate::hw_error::map_hw_error;
use crate::measurement::{MeasurementKind, MeasurementValues, measurement_values};
use crate::menu::Menu;
use crate::mode::{Context, Directive, Mode, transition};

/// Shown once per profile-file with rejected profiles, before the details.
pub const CALIBRATION_ERRORS_NOTICE: &str = "errors found in calibrations file";

pub(crate) struct Parts {
    pub sensor: std::result::Result<Box<dyn LightSensor>, BoxError>,
    pub buttons: Box<dyn ButtonPad>,
    pub battery: Box<dyn BatteryMonitor>,
    pub renderer: Box<dyn Renderer>,
    pub clock: Box<dyn Clock>,
    pub config: std::result::Result<Config, ConfigError>,
    pub calibrations: std::result::Result<RawProfiles, CalibrationsError>,
    pub version: String,
}

/// Screen owned by the current mode. Entering a mode replaces it.
#[derive(Debug)]
enum Screen {
    Measure(MeasureScreen),
    Menu(MenuScreen),
    Message(MessageScreen),
}

pub struct Colorimeter {
    sensor: Option<Box<dyn LightSensor>>,
    buttons: Box<dyn ButtonPad>,
    battery: Box<dyn BatteryMonitor>,
    renderer: Box<dyn Renderer>,
    clock: Box<dyn Clock>,
    config: Config,
    calibrations: Calibrations,
    menu: Menu,
    measurement: MeasurementKind,
    mode: Mode,
    screen: Screen,
    blank: BlankReference,
    blanked: bool,
    debouncer: Debouncer,
    notices: VecDeque<String>,
    version: String,
}

impl core::fmt::Debug for Colorimeter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Colorimeter")
            .field("mode", &self.mode)
            .field("measurement", &self.measurement)
            .field("blanked", &self.blanked)
            .field("pending_messages", &self.pending_messages())
            .finish_non_exhaustive()
    }
}

impl Colorimeter {
    pub fn builder() -> ColorimeterBuilder {
        ColorimeterBuilder::default()
    }

    pub(crate) fn start(parts: Parts) -> Self {
        let mut notices = VecDeque::new();

        let config = parts.config.unwrap_or_else(|e| {
            warn!(error = %e, "configuration not loaded, using defaults");
            notices.push_back(e.to_string());
            Config::default()
        });

        let calibrations = match parts.calibrations {
            Ok(raw) => {
                let c = Calibrations::from_raw(&raw);
                if c.has_errors() {
                    notices.push_back(CALIBRATION_ERRORS_NOTICE.to_string());
                }
                c
            }
            Err(e) => {
                warn!(error = %e, "calibrations not loaded");
                notices.push_back(e.to_string());
                Calibrations::empty()
            }
        };

        let menu = Menu::new(&calibrations, config.display.items_per_screen);
        let first = MeasurementKind::from_name(&menu.items()[0]);
        let measurement = match config.startup.as_deref() {
            Some(name) if menu.contains_measurement(name) => MeasurementKind::from_name(name),
            Some(name) => {
                notices.push_back(format!("startup measurement {name} not found"));
                first
            }
            None => first,
        };

        let debouncer = Debouncer::new(
            Duration::from_millis(config.timing.debounce_ms),
            parts.clock.now(),
        );
        let mut this = Self {
            sensor: None,
            buttons: parts.buttons,
            battery: parts.battery,
            renderer: parts.renderer,
            clock: parts.clock,
            config,
            calibrations,
            menu,
            measurement,
            mode: Mode::Measure,
            screen: Screen::Measure(MeasureScreen::new()),
            blank: BlankReference::default(),
            blanked: false,
            debouncer,
            notices,
            version: parts.version,
        };

        match parts.sensor {
            Err(e) => {
                error!(error = %e, "light sensor unavailable");
                this.enter(Mode::Abort);
                this.show_message(format!("missing sensor? {e}"), MessageKind::Abort);
            }
            Ok(mut sensor) => {
                if let Some(gain) = this.config.gain
                    && let Err(e) = sensor.set_gain(gain)
                {
                    warn!(error = %e, %gain, "could not apply configured gain");
                }
                this.sensor = Some(sensor);
                this.blank_now(false);
                match this.notices.pop_front() {
                    Some(first) => {
                        this.enter(Mode::Message);
                        this.show_message(first, MessageKind::Error);
                    }
                    None => this.enter(Mode::Measure),
                }
            }
        }
        info!(
            mode = %this.mode,
            measurement = this.measurement.name(),
            profiles = this.calibrations.names().count(),
            "colorimeter started"
        );
        this
    }

    /// One loop iteration: buttons, display update, pacing sleep.
    pub fn tick(&mut self) {
        self.handle_buttons();
        self.refresh();
        self.clock
            .sleep(Duration::from_millis(self.config.timing.loop_ms));
    }

    pub fn run_ticks(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Tick until `shutdown` is raised.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::Relaxed) {
            self.tick();
        }
        debug!("loop stopped");
    }

    /// Switch measurement directly, as if picked from the menu.
    pub fn select_measurement(&mut self, name: &str) -> Result<()> {
        if !self.menu.contains_measurement(name) {
            return Err(ColorimeterError::UnknownMeasurement(name.to_string()).into());
        }
        self.measurement = MeasurementKind::from_name(name);
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn measurement(&self) -> &MeasurementKind {
        &self.measurement
    }

    pub fn blank_reference(&self) -> &BlankReference {
        &self.blank
    }

    pub fn is_blanked(&self) -> bool {
        self.blanked
    }

    pub fn gain(&self) -> Option<Gain> {
        self.sensor.as_ref().map(|s| s.gain())
    }

    pub fn calibrations(&self) -> &Calibrations {
        &self.calibrations
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Startup notices and rejected profiles not yet shown.
    pub fn pending_messages(&self) -> usize {
        self.notices.len() + self.calibrations.error_count()
    }

    pub fn measure_screen(&self) -> Option<&MeasureScreen> {
        match &self.screen {
            Screen::Measure(s) => Some(s),
            _ => None,
        }
    }

    pub fn menu_screen(&self) -> Option<&MenuScreen> {
        match &self.screen {
            Screen::Menu(s) => Some(s),
            _ => None,
        }
    }

    pub fn message_screen(&self) -> Option<&MessageScreen> {
        match &self.screen {
            Screen::Message(s) => Some(s),
            _ => None,
        }
    }

    fn handle_buttons(&mut self) {
        let pressed = self.buttons.pressed();
        if pressed.is_empty() {
            return;
        }
        if !self.debouncer.accept(self.clock.now()) {
            trace!(buttons = pressed.bits(), "press debounced");
            return;
        }
        let ctx = Context {
            raw_sensor: self.measurement.is_raw_sensor(),
            messages_pending: self.pending_messages() > 0,
            selected: self.menu.selected(),
        };
        let Some(t) = transition(self.mode, pressed, &ctx) else {
            return;
        };
        if let Some(mode) = t.enter {
            self.enter(mode);
        }
        for d in t.directives {
            self.apply(d);
        }
    }

    /// Tear down the current screen and build the one for `mode`.
    fn enter(&mut self, mode: Mode) {
        debug!(from = %self.mode, to = %mode, "mode transition");
        self.mode = mode;
        self.screen = match mode {
            Mode::Measure => Screen::Measure(MeasureScreen::new()),
            Mode::Menu => {
                self.menu.reset();
                Screen::Menu(MenuScreen::new(self.config.display.items_per_screen))
            }
            Mode::Message | Mode::Abort => Screen::Message(MessageScreen::new()),
        };
        if mode == Mode::Menu {
            self.update_menu_screen();
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Blank => {
                if let Screen::Measure(s) = &mut self.screen {
                    s.set_blanking();
                }
                self.render();
                self.blank_now(true);
            }
            Directive::CycleGain => {
                if let Some(sensor) = self.sensor.as_mut() {
                    let next = sensor.gain().next();
                    match sensor.set_gain(next) {
                        Ok(()) => debug!(gain = %next, "gain changed"),
                        Err(e) => warn!(error = %e, gain = %next, "gain change failed"),
                    }
                }
                self.blanked = false;
            }
            Directive::MenuUp => self.menu.up(),
            Directive::MenuDown => self.menu.down(),
            Directive::SelectMeasurement(name) => {
                info!(measurement = %name, "measurement selected");
                self.measurement = MeasurementKind::from_name(&name);
            }
            Directive::ShowAbout => {
                let msg = format!("firmware version {}", self.version);
                self.show_message(msg, MessageKind::About);
            }
            Directive::ShowNextMessage => {
                if let Some(msg) = self
                    .notices
                    .pop_front()
                    .or_else(|| self.calibrations.pop_error())
                {
                    self.show_message(msg, MessageKind::Error);
                }
            }
        }
    }

    fn show_message(&mut self, message: String, kind: MessageKind) {
        let Screen::Message(s) = &mut self.screen else {
            return;
        };
        match kind {
            MessageKind::Error => {
                s.set_message(message, true);
                s.set_to_error();
            }
            MessageKind::About => {
                s.set_message(message, true);
                s.set_to_about();
            }
            MessageKind::Abort => {
                s.set_message(message, false);
                s.set_to_abort();
            }
        }
    }

    fn blank_now(&mut self, set_blanked: bool) {
        let Some(sensor) = self.sensor.as_deref_mut() else {
            return;
        };
        let cfg = BlankingCfg {
            samples: self.config.timing.blank_samples,
            interval: Duration::from_millis(self.config.timing.blank_interval_ms),
        };
        self.blank = blank_sensor(sensor, &*self.clock, &cfg);
        if set_blanked {
            self.blanked = true;
        }
    }

    fn refresh(&mut self) {
        match self.mode {
            Mode::Measure => self.update_measure_screen(),
            Mode::Menu => self.update_menu_screen(),
            Mode::Message | Mode::Abort => {}
        }
        self.render();
    }

    fn render(&mut self) {
        let view = match &self.screen {
            Screen::Measure(s) => View::Measure(s),
            Screen::Menu(s) => View::Menu(s),
            Screen::Message(s) => View::Message(s),
        };
        self.renderer.render(view);
    }

    fn update_menu_screen(&mut self) {
        let (labels, current) = self.menu.view(&self.calibrations);
        if let Screen::Menu(s) = &mut self.screen {
            s.set_menu_items(labels);
            s.set_curr_item(current);
        }
    }

    fn update_measure_screen(&mut self) {
        let Some(sensor) = self.sensor.as_mut() else {
            return;
        };
        let reading = sensor.read_raw_channels().map_err(|e| map_hw_error(&*e));
        let gain = sensor.gain();
        self.battery.update();
        let volts = self.battery.voltage_lowpass();

        let name = self.measurement.name();
        let units = match &self.measurement {
            MeasurementKind::Calibrated(n) => self.calibrations.units(n),
            _ => None,
        };
        let precision = usize::from(self.config.precision);
        let Screen::Measure(screen) = &mut self.screen else {
            return;
        };
        match reading {
            Ok(raw) => {
                let values = measurement_values(
                    &self.measurement,
                    &raw,
                    &self.blank,
                    &self.calibrations,
                    self.config.deviation_profile.as_deref(),
                );
                screen.set_measurement(name, units, value_lines(values), precision);
            }
            Err(e @ SensorError::Overflow { .. }) => {
                warn!(error = %e, measurement = name, "sensor overflow");
                screen.set_overflow(name);
            }
            Err(SensorError::Io(msg)) => {
                warn!(error = %msg, "sensor read failed");
                let line = ValueLine::new("error", Reading::Text(msg));
                screen.set_measurement(name, units, vec![line], precision);
            }
        }
        screen.set_battery(volts);
        screen.set_gain(gain);
        if self.blanked {
            screen.set_blanked();
        } else {
            screen.set_not_blanked();
        }
    }
}

fn value_lines(values: MeasurementValues) -> Vec<ValueLine> {
    match values {
        MeasurementValues::Channels(sample) => CHANNEL_NAMES
            .iter()
            .zip(sample)
            .map(|(ch, v)| ValueLine::new(*ch, Reading::Number(v)))
            .collect(),
        MeasurementValues::Concentrations(map) => map
            .into_iter()
            .map(|(ch, v)| ValueLine::new(ch, v.map_or(Reading::Missing, Reading::Number)))
            .collect(),
        MeasurementValues::Deviations(Ok(devs)) => devs
            .into_iter()
            .map(|(ch, d)| {
                let value = match d {
                    Deviation::Percent(p) => Reading::Percent(p),
                    Deviation::NotAvailable => Reading::Text("N/A".into()),
                };
                ValueLine::new(ch, value)
            })
            .collect(),
        MeasurementValues::Deviations(Err(e)) => {
            vec![ValueLine::new("error", Reading::Text(e.to_string()))]
        }
    }
}
