use colorimeter_core::{
    BlankReference, Calibrations, MeasurementKind, absorbances, measurement_values,
    transmittances,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

// Deterministic pseudo-random counts in [0, 65535)
fn synth_sample(seed: u32) -> [f64; 10] {
    let mut state = seed.max(1);
    let mut out = [0.0; 10];
    for v in &mut out {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        *v = f64::from(x % 65_535);
    }
    out
}

fn calibrations() -> Calibrations {
    let raw = json!({
        "Nitrate": {
            "fit_type": "linear", "fit_coef": [0.5, 0.01],
            "range": {"min": 0.0, "max": 10.0},
            "channels": {
                "415nm": {"fit_coef": [0.4, 0.0]},
                "630nm": {"fit_coef": [0.7, 0.02], "range": {"min": 0.0, "max": 5.0}}
            }
        },
        "PSI": {
            "fit_type": "linear", "fit_coef": [1],
            "expected_ratios": {"415nm": 1.2, "445nm": 1.1, "630nm": 0.8, "Clear": 0.5}
        }
    });
    let map = raw.as_object().cloned().unwrap_or_default();
    Calibrations::from_raw(&map)
}

pub fn bench_pipeline(c: &mut Criterion) {
    let mut g = c.benchmark_group("pipeline");
    // BENCH_SAMPLE_SIZE=10 cargo bench -p colorimeter_core --bench pipeline
    if let Ok(n) = std::env::var("BENCH_SAMPLE_SIZE").map(|s| s.parse::<usize>()) {
        g.sample_size(n.unwrap_or(50).max(10));
    }
    let blank = BlankReference::new(synth_sample(7));
    let raw = synth_sample(42);
    let cal = calibrations();

    g.bench_function("absorbance", |b| {
        b.iter(|| absorbances(&transmittances(black_box(&raw), black_box(&blank))))
    });
    let nitrate = MeasurementKind::from_name("Nitrate");
    g.bench_function("fit", |b| {
        b.iter(|| measurement_values(&nitrate, black_box(&raw), &blank, &cal, None))
    });
    let psi = MeasurementKind::from_name("PSI");
    g.bench_function("deviation", |b| {
        b.iter(|| measurement_values(&psi, black_box(&raw), &blank, &cal, Some("PSI")))
    });
    g.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
