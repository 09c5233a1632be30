//! Screen state handed to a renderer.
//!
//! Screens only hold data. The engine creates a fresh screen whenever the
//! mode changes and drops the others, so nothing leaks from one mode into
//! the next.

use colorimeter_traits::Gain;

/// A single displayed quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Number(f64),
    /// Percent deviation, already rounded.
    Percent(f64),
    /// Quantity not available (suppressed, undefined or not computed).
    Missing,
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLine {
    pub label: String,
    pub value: Reading,
}

impl ValueLine {
    pub fn new(label: impl Into<String>, value: Reading) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureScreen {
    pub name: String,
    pub units: Option<String>,
    pub lines: Vec<ValueLine>,
    pub precision: usize,
    pub overflow: bool,
    pub blanking: bool,
    pub blanked: bool,
    pub battery_volts: Option<f32>,
    pub gain: Option<Gain>,
}

impl MeasureScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_measurement(
        &mut self,
        name: &str,
        units: Option<&str>,
        lines: Vec<ValueLine>,
        precision: usize,
    ) {
        self.name = name.to_string();
        self.units = units.map(str::to_string);
        self.lines = lines;
        self.precision = precision;
        self.overflow = false;
        self.blanking = false;
    }

    pub fn set_overflow(&mut self, name: &str) {
        self.name = name.to_string();
        self.lines.clear();
        self.overflow = true;
    }

    pub fn set_blanking(&mut self) {
        self.blanking = true;
    }

    pub fn set_blanked(&mut self) {
        self.blanked = true;
    }

    pub fn set_not_blanked(&mut self) {
        self.blanked = false;
    }

    pub fn set_battery(&mut self, volts: f32) {
        self.battery_volts = Some(volts);
    }

    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = Some(gain);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuScreen {
    pub items_per_screen: usize,
    pub items: Vec<String>,
    pub current: usize,
}

impl MenuScreen {
    pub fn new(items_per_screen: usize) -> Self {
        Self {
            items_per_screen: items_per_screen.max(1),
            items: Vec::new(),
            current: 0,
        }
    }

    pub fn set_menu_items(&mut self, items: Vec<String>) {
        self.items = items;
    }

    /// Highlight row `pos` of the visible window.
    pub fn set_curr_item(&mut self, pos: usize) {
        self.current = pos;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageKind {
    #[default]
    Error,
    About,
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageScreen {
    pub message: String,
    pub kind: MessageKind,
    pub ok_to_continue: bool,
}

impl MessageScreen {
    pub fn new() -> Self {
        Self {
            ok_to_continue: true,
            ..Self::default()
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>, ok_to_continue: bool) {
        self.message = message.into();
        self.ok_to_continue = ok_to_continue;
    }

    pub fn set_to_error(&mut self) {
        self.kind = MessageKind::Error;
    }

    pub fn set_to_about(&mut self) {
        self.kind = MessageKind::About;
    }

    pub fn set_to_abort(&mut self) {
        self.kind = MessageKind::Abort;
        self.ok_to_continue = false;
    }
}
