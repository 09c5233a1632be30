//! Blanking procedure timing and reduction, driven by a deterministic clock.

use std::time::Duration;

use colorimeter_core::{BlankingCfg, blank_sensor};
use colorimeter_hardware::SimulatedSensor;
use colorimeter_hardware::error::HwError;
use colorimeter_traits::clock::test_clock::TestClock;

fn cfg(samples: usize, interval_ms: u64) -> BlankingCfg {
    BlankingCfg {
        samples,
        interval: Duration::from_millis(interval_ms),
    }
}

fn row(v: f64) -> [f64; 10] {
    [v; 10]
}

#[test]
fn sleeps_once_per_sample() {
    let clock = TestClock::new();
    let mut sensor = SimulatedSensor::new(row(100.0));
    let blank = blank_sensor(&mut sensor, &clock, &cfg(50, 50));
    assert_eq!(blank.values(), &row(100.0));
    assert_eq!(clock.sleeps().len(), 50);
    assert_eq!(clock.elapsed(), Duration::from_millis(2_500));
}

#[test]
fn median_rejects_outliers() {
    let clock = TestClock::new();
    let mut sensor = SimulatedSensor::new(row(0.0));
    for v in [10.0, 12.0, 11.0, 9_000.0, 0.0] {
        sensor.push_reading(Ok(row(v)));
    }
    let blank = blank_sensor(&mut sensor, &clock, &cfg(5, 1));
    assert_eq!(blank.values(), &row(11.0));
}

#[test]
fn even_sample_count_averages_middle_pair() {
    let clock = TestClock::new();
    let mut sensor = SimulatedSensor::new(row(0.0));
    for v in [10.0, 20.0, 30.0, 40.0] {
        sensor.push_reading(Ok(row(v)));
    }
    let blank = blank_sensor(&mut sensor, &clock, &cfg(4, 1));
    assert_eq!(blank.values(), &row(25.0));
}

#[test]
fn failed_reads_count_as_ones() {
    let clock = TestClock::new();
    let mut sensor = SimulatedSensor::new(row(0.0));
    sensor.push_reading(Err(HwError::Bus("nack".into())));
    sensor.push_reading(Err(HwError::Overflow { channel: 0 }));
    sensor.push_reading(Ok(row(50.0)));
    let blank = blank_sensor(&mut sensor, &clock, &cfg(3, 1));
    assert_eq!(blank.values(), &row(1.0));
    // Sleeps still happen for failed samples.
    assert_eq!(clock.sleeps().len(), 3);
}

#[test]
fn dark_channels_are_floored_to_one() {
    let clock = TestClock::new();
    let mut light = row(80.0);
    light[9] = 0.0;
    let mut sensor = SimulatedSensor::new(light);
    let blank = blank_sensor(&mut sensor, &clock, &cfg(3, 1));
    assert_eq!(blank.values()[9], 1.0);
    assert_eq!(blank.values()[0], 80.0);
}
