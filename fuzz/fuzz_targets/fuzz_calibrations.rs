#![no_main]
use colorimeter_core::{BlankReference, Calibrations, validate_profiles};
use colorimeter_traits::CHANNEL_COUNT;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(raw) = colorimeter_config::parse_calibrations(data) else {
        return;
    };
    let v = validate_profiles(&raw, CHANNEL_COUNT);
    // Every profile lands in exactly one bucket.
    assert_eq!(v.accepted.len() + v.rejected.len(), raw.len());
    for defects in v.rejected.values() {
        assert!(!defects.is_empty());
    }

    // Accepted profiles must evaluate without panicking.
    let cal = Calibrations::from_raw(&raw);
    let absorbance = colorimeter_core::absorbances(&colorimeter_core::transmittances(
        &[500.0; CHANNEL_COUNT],
        &BlankReference::default(),
    ));
    for name in v.accepted.keys() {
        let _ = cal.apply(name, &absorbance);
    }
});
