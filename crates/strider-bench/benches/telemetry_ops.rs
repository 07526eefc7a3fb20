//! Criterion micro-benchmarks for telemetry recording and comparison.

use criterion::{criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use strider_bench::{all_telemetry, reference_profile, sway_action};
use strider_control::{PdConfig, PdController};
use strider_core::{StepId, TelemetrySource};
use strider_env::Environment;
use strider_sim::{biped, JointSpaceEngine};
use strider_telemetry::{compare_logs, log_hash, LogLayout, LogRecord, Recorder, SampleFrame};

/// A 1000-step log from the reference profile.
fn reference_log(seed: u64) -> LogRecord {
    let mut env = Environment::new(reference_profile(seed).unwrap()).unwrap();
    let observation = env.reset().unwrap();
    let hold = env.controller().hold_action(&observation).unwrap();
    for step in 0..1000 {
        env.step(&sway_action(&hold, step, 0.05)).unwrap();
    }
    env.get_log().unwrap()
}

/// Benchmark: append one frame of every biped signal to an active run.
fn bench_record_frame(c: &mut Criterion) {
    let model = biped();
    let engine = JointSpaceEngine::new(model.clone()).unwrap();
    let controller = PdController::new(PdConfig::default(), &model.registry().unwrap()).unwrap();
    let options = all_telemetry();
    let layout = LogLayout::builder(options)
        .source(controller.name(), controller.signals().to_vec())
        .source(model.name.as_str(), engine.signals())
        .build()
        .unwrap();

    let mut frame = SampleFrame::for_layout(&layout);
    if let Some(out) = frame.source_mut(0) {
        out.resize(controller.signals().len(), 0.0);
    }
    if let Some(out) = frame.source_mut(1) {
        engine.sample(&options, out);
    }

    let mut recorder = Recorder::new();
    recorder.begin(layout, IndexMap::new());
    let mut step = StepId::default();

    c.bench_function("record_frame_biped", |b| {
        b.iter(|| {
            step = step.next();
            recorder.record(step, &frame).unwrap();
        });
    });
}

/// Benchmark: fingerprint a 1000-step log.
fn bench_log_hash(c: &mut Criterion) {
    let log = reference_log(42);

    c.bench_function("log_hash_1000_steps", |b| {
        b.iter(|| std::hint::black_box(log_hash(&log)));
    });
}

/// Benchmark: diff two 1000-step logs from different seeds.
fn bench_compare_divergent(c: &mut Criterion) {
    let a = reference_log(1);
    let b_log = reference_log(2);

    c.bench_function("compare_logs_divergent", |b| {
        b.iter(|| {
            let report = compare_logs(&a, &b_log);
            std::hint::black_box(&report);
        });
    });
}

criterion_group!(
    benches,
    bench_record_frame,
    bench_log_hash,
    bench_compare_divergent
);
criterion_main!(benches);
