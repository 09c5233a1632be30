#![no_main]
use libfuzzer_sys::fuzz_target;

// Parsing and validating arbitrary TOML may fail but must never panic.
fuzz_target!(|data: &str| {
    if let Ok(cfg) = colorimeter_config::load_toml(data) {
        let _ = cfg.validate();
    }
});
