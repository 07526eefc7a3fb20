//! Criterion benchmarks for the reference control loop.

use criterion::{criterion_group, criterion_main, Criterion};
use strider_bench::{minimal_profile, reference_profile, sway_action};
use strider_env::Environment;

fn bench_step_full_telemetry(c: &mut Criterion) {
    let mut env = Environment::new(reference_profile(42).unwrap()).unwrap();
    let observation = env.reset().unwrap();
    let hold = env.controller().hold_action(&observation).unwrap();

    // Warm up: the first step sizes the log columns.
    env.step(&hold).unwrap();

    c.bench_function("step_full_telemetry", |b| {
        b.iter(|| {
            let observation = env.step(&hold).unwrap();
            std::hint::black_box(&observation);
        });
    });
}

fn bench_step_minimal_telemetry(c: &mut Criterion) {
    let mut env = Environment::new(minimal_profile(42).unwrap()).unwrap();
    let observation = env.reset().unwrap();
    let hold = env.controller().hold_action(&observation).unwrap();
    env.step(&hold).unwrap();

    c.bench_function("step_minimal_telemetry", |b| {
        b.iter(|| {
            let observation = env.step(&hold).unwrap();
            std::hint::black_box(&observation);
        });
    });
}

fn bench_1000_steps_sway(c: &mut Criterion) {
    c.bench_function("1000_steps_sway", |b| {
        b.iter(|| {
            let mut env = Environment::new(reference_profile(42).unwrap()).unwrap();
            let observation = env.reset().unwrap();
            let hold = env.controller().hold_action(&observation).unwrap();
            for step in 0..1000 {
                let observation = env.step(&sway_action(&hold, step, 0.05)).unwrap();
                std::hint::black_box(&observation);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_step_full_telemetry,
    bench_step_minimal_telemetry,
    bench_1000_steps_sway
);
criterion_main!(benches);
