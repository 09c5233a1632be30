use colorimeter_hardware::SimulatedSensor;
use colorimeter_hardware::error::HwError;
use colorimeter_traits::{CHANNEL_COUNT, Gain, LightSensor};
use rstest::rstest;

#[rstest]
#[case(Gain::X1, 100.0)]
#[case(Gain::X2, 200.0)]
#[case(Gain::X0_5, 50.0)]
fn counts_scale_with_gain(#[case] gain: Gain, #[case] expected: f64) {
    let mut sensor = SimulatedSensor::new([100.0; CHANNEL_COUNT]);
    sensor.set_gain(gain).unwrap();
    let sample = sensor.read_raw_channels().unwrap();
    assert!(sample.iter().all(|v| (*v - expected).abs() < 1e-9));
    assert_eq!(sensor.gain(), gain);
}

#[test]
fn saturated_channel_reports_overflow() {
    let mut light = [100.0; CHANNEL_COUNT];
    light[3] = 1_000.0;
    let mut sensor = SimulatedSensor::new(light);
    sensor.set_gain(Gain::X128).unwrap();
    let err = sensor.read_raw_channels().expect_err("channel 3 saturates");
    match err.downcast_ref::<HwError>() {
        Some(HwError::Overflow { channel }) => assert_eq!(*channel, 3),
        other => panic!("expected overflow, got {other:?}"),
    }
}

#[test]
fn transmission_applies_after_blank_reads() {
    let mut sensor =
        SimulatedSensor::new([100.0; CHANNEL_COUNT]).with_sample_after(2, [0.5; CHANNEL_COUNT]);
    assert_eq!(sensor.read_raw_channels().unwrap()[0], 100.0);
    assert_eq!(sensor.read_raw_channels().unwrap()[0], 100.0);
    assert_eq!(sensor.read_raw_channels().unwrap()[0], 50.0);
}

#[test]
fn scripted_readings_take_precedence() {
    let mut sensor = SimulatedSensor::new([100.0; CHANNEL_COUNT]);
    sensor.push_reading(Err(HwError::Bus("nak".into())));
    sensor.push_reading(Ok([7.0; CHANNEL_COUNT]));
    let err = sensor.read_raw_channels().expect_err("scripted failure");
    assert!(err.to_string().contains("nak"));
    assert_eq!(sensor.read_raw_channels().unwrap()[9], 7.0);
    assert_eq!(sensor.read_raw_channels().unwrap()[9], 100.0);
}
