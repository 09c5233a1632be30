use std::error::Error;

use colorimeter_core::hw_error::map_hw_error;
use colorimeter_core::mocks::FailingSensor;
use colorimeter_core::{BlankingCfg, SensorError, blank_sensor};
use colorimeter_hardware::error::HwError;
use colorimeter_traits::LightSensor;
use colorimeter_traits::clock::test_clock::TestClock;
use rstest::rstest;

fn boxed(e: HwError) -> Box<dyn Error + Send + Sync> {
    Box::new(e)
}

#[rstest]
#[case(HwError::Overflow { channel: 7 }, SensorError::Overflow { channel: Some(7) })]
#[case(HwError::NotDetected, SensorError::Io("sensor not detected".into()))]
#[case(HwError::Bus("arbitration lost".into()), SensorError::Io("sensor i/o error: arbitration lost".into()))]
fn hardware_errors_map_to_sensor_errors(#[case] hw: HwError, #[case] expect: SensorError) {
    assert_eq!(map_hw_error(&*boxed(hw)), expect);
}

#[test]
fn overflow_display_names_the_channel_when_known() {
    assert_eq!(
        SensorError::Overflow { channel: Some(2) }.to_string(),
        "sensor overflow on channel 2"
    );
    assert_eq!(
        SensorError::Overflow { channel: None }.to_string(),
        "sensor overflow"
    );
}

#[test]
fn failing_sensor_reads_map_to_io() {
    let mut s = FailingSensor::new("bus stuck low");
    let e = s.read_raw_channels().unwrap_err();
    assert_eq!(map_hw_error(&*e), SensorError::Io("bus stuck low".into()));
}

#[test]
fn blanking_a_failing_sensor_falls_back_to_ones() {
    let clock = TestClock::new();
    let mut s = FailingSensor::new("bus stuck low");
    let blank = blank_sensor(&mut s, &clock, &BlankingCfg::default());
    assert_eq!(blank.values(), &[1.0; 10]);
    assert_eq!(clock.sleeps().len(), 50);
}
