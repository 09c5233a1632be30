#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core colorimeter logic (hardware-agnostic).
//!
//! All hardware interactions go through the `colorimeter_traits` traits
//! (`LightSensor`, `ButtonPad`, `BatteryMonitor`, `Clock`) and the display
//! goes through `colorimeter_ui::Renderer`.
//!
//! ## Architecture
//!
//! - **Validation**: raw calibration records to typed profiles (`validate`)
//! - **Fits**: absorbance to concentration per channel (`fit`)
//! - **Deviations**: measured vs expected absorbance ratios (`deviation`)
//! - **Pipeline**: raw counts, transmittance, absorbance (`measurement`)
//! - **Blanking**: median reference capture (`blank`)
//! - **Modes**: pure transition table (`mode`), driven by `engine`
//!
//! ## Units
//!
//! Raw values are sensor counts. Transmittance is a fraction in `[0, 1]`,
//! absorbance is `-log10(transmittance)` and concentrations are in whatever
//! units the profile declares.

pub mod blank;
pub mod builder;
pub mod calibrations;
pub mod debounce;
pub mod deviation;
pub mod engine;
pub mod error;
pub mod fit;
pub mod hw_error;
pub mod measurement;
pub mod menu;
pub mod mocks;
pub mod mode;
pub mod profile;
pub mod util;
pub mod validate;

pub use blank::{BlankReference, BlankingCfg, blank_sensor};
pub use builder::ColorimeterBuilder;
pub use calibrations::Calibrations;
pub use deviation::{BASELINE_CHANNEL, Deviation, deviations};
pub use engine::{CALIBRATION_ERRORS_NOTICE, Colorimeter};
pub use error::{BuildError, ColorimeterError, DeviationError, SensorError};
pub use fit::{Concentrations, apply};
pub use measurement::{
    ABSORBANCE, DEFAULT_MEASUREMENTS, MeasurementKind, MeasurementValues, RAW_SENSOR,
    TRANSMITTANCE, absorbances, measurement_values, transmittances,
};
pub use menu::{ABOUT, Menu};
pub use mode::{Context, Directive, Mode, Transition, transition};
pub use profile::{CalibrationProfile, ChannelFit, Fit, FitType, ValidRange};
pub use validate::{Validation, validate_profile, validate_profiles};
