//! End-to-end control loop example.
//!
//! Demonstrates: build config → Environment → reset → hold pose → sway →
//! read the log → render → reset with another seed → compare runs.

use strider_bench::{reference_profile, sway_action};
use strider_core::RenderMode;
use strider_env::Environment;
use strider_telemetry::{compare_logs, log_hash};

fn main() {
    println!("=== Strider Standing Biped Example ===\n");

    let mut env = Environment::new(reference_profile(42).unwrap()).unwrap();

    // --- Run 1: hold, then sway ---
    println!("Run 1: 500 steps holding, 500 steps swaying");
    let observation = env.reset().unwrap();
    let hold = env.controller().hold_action(&observation).unwrap();

    for step in 0..1000u64 {
        let action = if step < 500 {
            hold.clone()
        } else {
            sway_action(&hold, step, 0.1)
        };
        env.step(&action).unwrap();

        if step % 250 == 0 || step == 999 {
            let metrics = env.last_metrics();
            println!(
                "  step {:>4}: t={:>6.3}s, signals={:>3}, time={:>4}μs (engine {}μs, telemetry {}μs)",
                step + 1,
                env.time(),
                metrics.signals_recorded,
                metrics.total_us,
                metrics.engine_us,
                metrics.telemetry_us,
            );
        }
    }

    let first = env.get_log().unwrap();
    println!(
        "  log: {} columns × {} steps, hash {:016x}",
        first.len(),
        first.steps,
        log_hash(&first)
    );

    let frame = env.render(RenderMode::RgbArray).unwrap();
    let (width, height) = frame.shape();
    println!("  frame: {width}×{height}, content hash {:016x}\n", frame.content_hash());

    // --- Run 2: same actions, different seed ---
    println!("Run 2: same actions, seed 43");
    let observation = env.reset_seeded(43, |_| {}).unwrap();
    let hold = env.controller().hold_action(&observation).unwrap();
    for step in 0..1000u64 {
        let action = if step < 500 {
            hold.clone()
        } else {
            sway_action(&hold, step, 0.1)
        };
        env.step(&action).unwrap();
    }
    let second = env.get_log().unwrap();

    match compare_logs(&first, &second) {
        None => println!("  runs are bit-identical"),
        Some(report) => println!(
            "  {} columns diverge, first at step {:?}",
            report.divergences.len(),
            report.first_step()
        ),
    }

    println!("\n=== Done ===");
}
