use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use parkvoice::analysis::audio::{CANONICAL_SAMPLE_RATE, Waveform};
use parkvoice::extract_features;

fn voiced_waveform(seconds: usize) -> Waveform {
    let sr = CANONICAL_SAMPLE_RATE as f32;
    let samples = (0..seconds * CANONICAL_SAMPLE_RATE as usize)
        .map(|i| {
            let t = i as f32 / sr;
            let phase = 2.0 * std::f32::consts::PI * 150.0 * t;
            0.4 * phase.sin() + 0.1 * (2.0 * phase).sin()
        })
        .collect();
    Waveform::new(samples, CANONICAL_SAMPLE_RATE)
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_features");
    group.sample_size(10);
    for seconds in [3usize, 10] {
        let waveform = voiced_waveform(seconds);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{seconds}s")),
            &waveform,
            |b, waveform| b.iter(|| extract_features(black_box(waveform)).expect("extract")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
