//! Benchmark profiles and utilities for the Strider control harness.
//!
//! Provides pre-built [`EnvConfig`] profiles for benchmarking and examples:
//!
//! - [`reference_profile`]: the biped with the bitmap renderer and every
//!   telemetry flag enabled
//! - [`minimal_profile`]: the biped with only the always-on signals and no
//!   renderer
//! - [`sway_action`]: a deterministic time-varying target around a pose

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use strider_core::{Action, EngineOptions, TelemetryOptions};
use strider_env::EnvConfig;
use strider_render::{CameraConfig, CanvasRenderer};
use strider_sim::{biped, JointSpaceEngine};

/// Every telemetry flag enabled.
pub fn all_telemetry() -> TelemetryOptions {
    TelemetryOptions {
        enable_configuration: true,
        enable_velocity: true,
        enable_acceleration: true,
        enable_command: true,
        enable_motor_effort: true,
        enable_energy: true,
    }
}

/// Every optional telemetry flag disabled.
pub fn no_telemetry() -> TelemetryOptions {
    TelemetryOptions {
        enable_configuration: false,
        enable_velocity: false,
        enable_acceleration: false,
        enable_command: false,
        enable_motor_effort: false,
        enable_energy: false,
    }
}

/// Build the reference benchmark profile.
///
/// Biped, default camera, all telemetry, and a small initial-state
/// perturbation drawn from `seed`.
pub fn reference_profile(seed: u64) -> Result<EnvConfig, Box<dyn Error>> {
    let mut options = EngineOptions::default();
    options.telemetry = all_telemetry();
    options.initial_state.position_noise = 0.01;
    options.initial_state.velocity_noise = 0.01;
    let engine = JointSpaceEngine::new(biped())?;
    let renderer = CanvasRenderer::new(CameraConfig::default())?;
    Ok(EnvConfig::new(engine)
        .with_renderer(renderer)
        .with_options(options)
        .with_seed(seed))
}

/// Build the minimal profile: same robot, no renderer, no optional signals.
pub fn minimal_profile(seed: u64) -> Result<EnvConfig, Box<dyn Error>> {
    let mut options = EngineOptions::default();
    options.telemetry = no_telemetry();
    let engine = JointSpaceEngine::new(biped())?;
    Ok(EnvConfig::new(engine).with_options(options).with_seed(seed))
}

/// Targets swaying sinusoidally around `base`.
///
/// Each channel gets its own phase so the joints do not move in lockstep.
/// Equal `(base, step)` always give equal actions.
pub fn sway_action(base: &Action, step: u64, amplitude: f64) -> Action {
    let t = step as f64 * 1e-3;
    base.iter()
        .enumerate()
        .map(|(i, (channel, q))| {
            let phase = i as f64 * 0.7;
            (channel, q + amplitude * (2.0 * t + phase).sin())
        })
        .collect()
}
