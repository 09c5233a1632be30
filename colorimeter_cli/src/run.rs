//! `run`: drive the device loop against simulated peripherals.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colorimeter_config::{CalibrationsError, Config, ConfigError, RawProfiles, Timing};
use colorimeter_core::{Colorimeter, Mode};
use colorimeter_hardware::{ScriptedButtons, SimulatedBattery, SimulatedSensor};
use colorimeter_traits::{Buttons, CHANNEL_COUNT};
use colorimeter_ui::TextRenderer;
use eyre::Result;
use serde_json::json;

use crate::cli::CliError;

/// Nominal pack voltage reported by the simulated battery.
const SIM_BATTERY_VOLTS: f32 = 3.9;

#[derive(Debug)]
pub struct RunArgs {
    pub ticks: Option<u64>,
    pub presses: Vec<Buttons>,
    pub press_every: usize,
    pub light: f64,
    pub transmission: Option<f64>,
    pub measurement: Option<String>,
    pub no_sensor: bool,
    pub all_frames: bool,
}

pub fn run_device(
    config: std::result::Result<Config, ConfigError>,
    calibrations: std::result::Result<RawProfiles, CalibrationsError>,
    args: RunArgs,
    json_out: bool,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let blank_reads = config
        .as_ref()
        .map_or(Timing::default().blank_samples, |c| c.timing.blank_samples);

    let sensor = if args.no_sensor {
        SimulatedSensor::connect(false)
    } else {
        let mut s = SimulatedSensor::new([args.light; CHANNEL_COUNT]);
        if let Some(t) = args.transmission {
            if !(0.0..=1.0).contains(&t) {
                return Err(CliError::BadTransmission(t).into());
            }
            s = s.with_sample_after(blank_reads, [t; CHANNEL_COUNT]);
        }
        Ok(s)
    };

    let renderer = TextRenderer::new(std::io::stdout());
    let renderer = if args.all_frames {
        renderer
    } else {
        renderer.only_changes()
    };

    let mut device = Colorimeter::builder()
        .with_sensor_result(sensor)
        .with_buttons(ScriptedButtons::spaced(args.presses, args.press_every))
        .with_battery(SimulatedBattery::new(SIM_BATTERY_VOLTS))
        .with_renderer(renderer)
        .with_config_result(config)
        .with_calibrations_result(calibrations)
        .with_version(env!("CARGO_PKG_VERSION"))
        .build()?;

    if let Some(name) = args.measurement.as_deref() {
        device.select_measurement(name)?;
    }

    let ticks = match args.ticks {
        Some(limit) => {
            let mut n = 0u64;
            while n < limit && !shutdown.load(Ordering::Relaxed) {
                device.tick();
                n += 1;
            }
            Some(n)
        }
        None => {
            device.run(&shutdown);
            None
        }
    };
    tracing::info!(?ticks, mode = %device.mode(), "run finished");

    if json_out {
        println!("{}", summary(&device, ticks));
    }

    if device.mode() == Mode::Abort {
        let msg = device
            .message_screen()
            .map(|m| m.message.clone())
            .unwrap_or_default();
        return Err(CliError::DeviceAborted(msg).into());
    }
    Ok(())
}

fn summary(device: &Colorimeter, ticks: Option<u64>) -> serde_json::Value {
    json!({
        "ticks": ticks,
        "mode": device.mode().to_string(),
        "measurement": device.measurement().name(),
        "blanked": device.is_blanked(),
        "gain": device.gain().map(|g| g.to_string()),
        "pending_messages": device.pending_messages(),
    })
}
