//! Hardware-facing seams of the colorimeter.
//!
//! The engine never talks to a bus directly; it reads the light sensor, polls
//! the button pad and samples the battery through these traits. Errors cross
//! the boundary boxed so drivers keep their own error types.
pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Number of channels the light sensor reports per sample.
pub const CHANNEL_COUNT: usize = 10;

/// Physical channel layout, in sample order. The last two channels are not
/// narrow-band wavelengths.
pub const CHANNEL_NAMES: [&str; CHANNEL_COUNT] = [
    "415nm", "445nm", "480nm", "515nm", "555nm", "590nm", "630nm", "680nm", "910nm", "Clear",
];

/// One raw reading per channel, in `CHANNEL_NAMES` order.
pub type Sample = [f64; CHANNEL_COUNT];

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub trait LightSensor {
    /// Read every channel once. Saturation and bus failures are reported as
    /// errors; the core tells them apart.
    fn read_raw_channels(&mut self) -> Result<Sample, BoxError>;
    fn set_gain(&mut self, gain: Gain) -> Result<(), BoxError>;
    fn gain(&self) -> Gain;
}

pub trait ButtonPad {
    /// Buttons held down right now. Empty when nothing is pressed.
    fn pressed(&mut self) -> Buttons;
}

pub trait BatteryMonitor {
    /// Take one voltage sample and fold it into the low-pass estimate.
    fn update(&mut self);
    fn voltage_lowpass(&self) -> f32;
}

/// Bitmask of concurrently pressed buttons.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const ITIME: Buttons = Buttons(1 << 0);
    pub const GAIN: Buttons = Buttons(1 << 1);
    pub const BLANK: Buttons = Buttons(1 << 2);
    pub const MENU: Buttons = Buttons(1 << 3);
    pub const RIGHT: Buttons = Buttons(1 << 4);
    pub const DOWN: Buttons = Buttons(1 << 5);
    pub const UP: Buttons = Buttons(1 << 6);
    pub const LEFT: Buttons = Buttons(1 << 7);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every button in `other` is held.
    #[inline]
    pub const fn contains(self, other: Buttons) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for Buttons {
    type Output = Buttons;
    fn bitor(self, rhs: Self) -> Self::Output {
        Buttons(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for Buttons {
    type Err = String;

    /// Parse a single button name (`menu`, `up`, `down`, `left`, `right`,
    /// `blank`, `gain`, `itime`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "menu" => Ok(Buttons::MENU),
            "up" => Ok(Buttons::UP),
            "down" => Ok(Buttons::DOWN),
            "left" => Ok(Buttons::LEFT),
            "right" => Ok(Buttons::RIGHT),
            "blank" => Ok(Buttons::BLANK),
            "gain" => Ok(Buttons::GAIN),
            "itime" => Ok(Buttons::ITIME),
            "" | "none" => Ok(Buttons::NONE),
            other => Err(format!("unknown button '{other}'")),
        }
    }
}

/// Analog gain steps supported by the spectral sensor, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gain {
    X0_5,
    X1,
    X2,
    X4,
    X8,
    X16,
    X32,
    X64,
    X128,
    X256,
    X512,
}

impl Gain {
    /// Every gain step in cycle order.
    pub const ALL: [Gain; 11] = [
        Gain::X0_5,
        Gain::X1,
        Gain::X2,
        Gain::X4,
        Gain::X8,
        Gain::X16,
        Gain::X32,
        Gain::X64,
        Gain::X128,
        Gain::X256,
        Gain::X512,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Gain::X0_5 => "0.5x",
            Gain::X1 => "1x",
            Gain::X2 => "2x",
            Gain::X4 => "4x",
            Gain::X8 => "8x",
            Gain::X16 => "16x",
            Gain::X32 => "32x",
            Gain::X64 => "64x",
            Gain::X128 => "128x",
            Gain::X256 => "256x",
            Gain::X512 => "512x",
        }
    }

    /// Multiplier applied by the sensor front end.
    pub const fn factor(self) -> f64 {
        match self {
            Gain::X0_5 => 0.5,
            Gain::X1 => 1.0,
            Gain::X2 => 2.0,
            Gain::X4 => 4.0,
            Gain::X8 => 8.0,
            Gain::X16 => 16.0,
            Gain::X32 => 32.0,
            Gain::X64 => 64.0,
            Gain::X128 => 128.0,
            Gain::X256 => 256.0,
            Gain::X512 => 512.0,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|g| *g == self).unwrap_or(0)
    }

    /// The following step, wrapping from the highest gain to the lowest.
    pub fn next(self) -> Gain {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

impl Default for Gain {
    fn default() -> Self {
        Gain::X64
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let t = t.strip_suffix('x').unwrap_or(&t);
        Gain::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().trim_end_matches('x') == t)
            .ok_or_else(|| format!("unknown gain '{s}'"))
    }
}
