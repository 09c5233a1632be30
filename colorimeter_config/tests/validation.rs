use colorimeter_config::{Config, ConfigError, load_config_file, load_toml};
use colorimeter_traits::Gain;
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

#[test]
fn empty_file_yields_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.precision, 2);
    assert!(cfg.startup.is_none());
    assert!(cfg.gain.is_none());
    assert_eq!(cfg.timing.debounce_ms, 600);
    assert_eq!(cfg.timing.blank_samples, 50);
}

#[test]
fn parses_full_config() {
    let toml = r#"
startup = "Transmittance"
gain = "16x"
precision = 3
deviation_profile = "PSILOCYBIN"

[timing]
loop_ms = 50
debounce_ms = 300
blank_samples = 9
blank_interval_ms = 10

[display]
items_per_screen = 4

[logging]
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.startup.as_deref(), Some("Transmittance"));
    assert_eq!(cfg.gain, Some(Gain::X16));
    assert_eq!(cfg.precision, 3);
    assert_eq!(cfg.deviation_profile.as_deref(), Some("PSILOCYBIN"));
    assert_eq!(cfg.timing.blank_samples, 9);
    assert_eq!(cfg.display.items_per_screen, 4);
}

#[test]
fn accepts_long_field_aliases() {
    let toml = r#"
startup_measurement_name = "Absorbance"
display_precision = 1
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    assert_eq!(cfg.startup.as_deref(), Some("Absorbance"));
    assert_eq!(cfg.precision, 1);
}

#[test]
fn unknown_gain_is_a_parse_error() {
    let err = load_toml(r#"gain = "3x""#).expect_err("3x is not a gain step");
    assert!(err.to_string().contains("unknown gain"));
}

#[rstest]
#[case("precision = 11", "precision must be in [0, 10]")]
#[case("[timing]\nloop_ms = 0", "timing.loop_ms must be >= 1")]
#[case("[timing]\ndebounce_ms = 0", "timing.debounce_ms must be >= 1")]
#[case("[timing]\nblank_samples = 0", "timing.blank_samples must be >= 1")]
#[case("[timing]\nblank_samples = 10001", "timing.blank_samples must be <= 10000")]
#[case("[timing]\nblank_samples = 9000000000000000000", "timing.blank_samples must be <= 10000")]
#[case("[display]\nitems_per_screen = 0", "display.items_per_screen must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation must be one of")]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[test]
fn blank_sample_bound_is_inclusive() {
    let cfg = load_toml("[timing]\nblank_samples = 10000").expect("parse TOML");
    cfg.validate().expect("upper bound is allowed");
}

#[test]
fn file_loader_reports_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_config_file(&dir.path().join("nope.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn file_loader_runs_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, "precision = 42\n").unwrap();
    let err = load_config_file(&path).expect_err("precision too large");
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("invalid configuration"));
}

#[test]
fn default_config_matches_empty_toml() {
    let a = Config::default();
    let b = load_toml("").unwrap();
    assert_eq!(a.precision, b.precision);
    assert_eq!(a.timing.loop_ms, b.timing.loop_ms);
    assert_eq!(a.display.items_per_screen, b.display.items_per_screen);
}
