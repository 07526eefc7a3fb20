//! Integration test: environment lifecycle and failure handling.
//!
//! Drives the environment with the scripted mock engine to check state
//! gating, transactional rejection of bad actions, faulting on engine and
//! telemetry failures, and the telemetry lock during a run.

use strider_core::{Action, ActionError, EngineError, RenderMode, TelemetryError};
use strider_env::{ConfigError, EnvConfig, EnvError, EnvState, Environment};
use strider_test_utils::fixtures::{arm, arm_with_effort};
use strider_test_utils::{MockEngine, MockRenderer};

const CLOCK_KEY: &str = "Global.stepper.Time";

fn env_with(engine: MockEngine) -> Environment {
    Environment::new(EnvConfig::new(engine).with_seed(7)).unwrap()
}

fn targets(shoulder: f64, elbow: f64) -> Action {
    [("shoulder_motor", shoulder), ("elbow_motor", elbow)]
        .into_iter()
        .collect()
}

// ── State gating ────────────────────────────────────────────────────

#[test]
fn operations_before_reset_are_not_ready() {
    let mut env = env_with(MockEngine::new(arm()));
    assert_eq!(env.state(), EnvState::Uninitialized);

    match env.step(&targets(0.0, 0.0)) {
        Err(EnvError::NotReady {
            operation: "step",
            state: EnvState::Uninitialized,
        }) => {}
        other => panic!("expected NotReady, got {other:?}"),
    }
    match env.get_log() {
        Err(EnvError::NotReady { operation: "get_log", .. }) => {}
        other => panic!("expected NotReady, got {other:?}"),
    }
    match env.render(RenderMode::RgbArray) {
        Err(EnvError::NotReady { operation: "render", .. }) => {}
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn reset_yields_step_zero_and_empty_log() {
    let mut env = env_with(MockEngine::new(arm()));
    let observation = env.reset().unwrap();
    assert_eq!(observation.step.0, 0);
    assert_eq!(observation.time, 0.0);
    assert_eq!(env.state(), EnvState::Ready);

    let log = env.get_log().unwrap();
    assert_eq!(log.steps, 0);
    assert!(log.contains_key(CLOCK_KEY));
    assert!(log.columns.values().all(Vec::is_empty));
    assert_eq!(log.constant("robot"), Some("arm"));
    assert_eq!(log.constant("controller"), Some("pd"));
    assert_eq!(log.constant("seed"), Some("7"));
    assert_eq!(log.constant("telemetry.enableVelocity"), Some("false"));
}

#[test]
fn clock_column_tracks_simulation_time() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    for _ in 0..3 {
        env.step(&targets(0.2, -0.1)).unwrap();
    }
    let log = env.get_log().unwrap();
    let clock = log.get(CLOCK_KEY).unwrap();
    let dt = env.engine_options().stepper.timestep;
    assert_eq!(clock, &[dt, 2.0 * dt, 3.0 * dt]);
    assert_eq!(env.time(), 3.0 * dt);
}

// ── Actions ─────────────────────────────────────────────────────────

#[test]
fn invalid_action_changes_nothing() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    env.step(&targets(0.2, -0.1)).unwrap();
    let before = env.get_log().unwrap();

    let mut action = targets(0.2, -0.1);
    action.insert("wrist_motor", 0.0);
    match env.step(&action) {
        Err(EnvError::InvalidAction(ActionError::Mismatch { .. })) => {}
        other => panic!("expected InvalidAction, got {other:?}"),
    }
    let partial: Action = [("shoulder_motor", 0.0)].into_iter().collect();
    assert!(matches!(
        env.step(&partial),
        Err(EnvError::InvalidAction(_))
    ));

    assert_eq!(env.get_log().unwrap(), before);
    assert_eq!(env.current_step().0, 1);
    assert_eq!(env.state(), EnvState::Stepping);
}

#[test]
fn non_finite_target_rejected() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    assert!(matches!(
        env.step(&targets(f64::NAN, 0.0)),
        Err(EnvError::InvalidAction(ActionError::NonFiniteTarget { .. }))
    ));
    assert_eq!(env.state(), EnvState::Ready);
}

// ── Faults ──────────────────────────────────────────────────────────

#[test]
fn engine_failure_faults_until_reset() {
    let mut env = env_with(MockEngine::new(arm()).failing_at(3));
    env.reset().unwrap();
    let action = targets(0.2, -0.1);
    env.step(&action).unwrap();
    env.step(&action).unwrap();
    match env.step(&action) {
        Err(EnvError::EngineFailure(EngineError::Terminated { .. })) => {}
        other => panic!("expected EngineFailure, got {other:?}"),
    }
    assert_eq!(env.state(), EnvState::Faulted);

    // The log up to the failure stays readable.
    assert_eq!(env.get_log().unwrap().steps, 2);
    assert!(matches!(
        env.step(&action),
        Err(EnvError::NotReady {
            state: EnvState::Faulted,
            ..
        })
    ));

    env.reset().unwrap();
    assert_eq!(env.state(), EnvState::Ready);
    env.step(&action).unwrap();
}

#[test]
fn failed_engine_reset_keeps_previous_options_and_clock() {
    let mut env = env_with(MockEngine::new(arm()).failing_reset_after(1));
    env.reset().unwrap();
    let action = targets(0.2, -0.1);
    for _ in 0..3 {
        env.step(&action).unwrap();
    }

    match env.reset_with(|o| o.stepper.timestep = 2e-3) {
        Err(EnvError::EngineFailure(EngineError::Terminated { .. })) => {}
        other => panic!("expected EngineFailure, got {other:?}"),
    }
    assert_eq!(env.state(), EnvState::Faulted);
    assert!(env.observation().is_none());

    // Staged and engine options both still describe the logged run.
    assert_eq!(env.engine_options().stepper.timestep, 1e-3);
    assert_eq!(env.engine().options().stepper.timestep, 1e-3);
    assert_eq!(env.seed(), 7);

    let log = env.get_log().unwrap();
    assert_eq!(log.steps, 3);
    assert_eq!(log.constant("timestep"), Some("0.001"));
    let clock = log.get(CLOCK_KEY).unwrap();
    assert_eq!(clock.last().copied(), Some(env.time()));
    assert_eq!(env.time(), 3.0 * 1e-3);

    assert!(matches!(
        env.step(&action),
        Err(EnvError::NotReady {
            state: EnvState::Faulted,
            ..
        })
    ));
}

#[test]
fn misbehaving_telemetry_is_a_log_inconsistency() {
    let mut env = env_with(MockEngine::new(arm()).with_extra_samples(1));
    env.reset().unwrap();
    match env.step(&targets(0.0, 0.0)) {
        Err(EnvError::LogInconsistency(TelemetryError::ExtraSamples { source_name, .. })) => {
            assert_eq!(source_name, "arm");
        }
        other => panic!("expected LogInconsistency, got {other:?}"),
    }
    assert_eq!(env.state(), EnvState::Faulted);
    // Nothing was appended for the rejected step.
    assert_eq!(env.get_log().unwrap().steps, 0);
}

// ── Options ─────────────────────────────────────────────────────────

#[test]
fn telemetry_locked_during_run() {
    let mut env = env_with(MockEngine::new(arm()));

    // Before any run, telemetry options may change freely.
    let mut options = *env.engine_options();
    options.telemetry.enable_velocity = true;
    env.set_engine_options(options).unwrap();
    env.reset().unwrap();

    options.telemetry.enable_velocity = false;
    match env.set_engine_options(options) {
        Err(EnvError::Configuration(ConfigError::TelemetryLocked)) => {}
        other => panic!("expected TelemetryLocked, got {other:?}"),
    }

    // Non-telemetry options stage for the next reset.
    let mut stepper_only = *env.engine_options();
    stepper_only.stepper.timestep = 2e-3;
    env.set_engine_options(stepper_only).unwrap();
    env.reset().unwrap();
    assert_eq!(env.get_log().unwrap().constant("timestep"), Some("0.002"));

    // A reset may change telemetry.
    env.reset_with(|o| o.telemetry.enable_velocity = false).unwrap();
    assert!(!env.engine_options().telemetry.enable_velocity);
}

#[test]
fn invalid_options_at_reset_keep_previous_run() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    env.step(&targets(0.2, -0.1)).unwrap();

    match env.reset_with(|o| o.stepper.timestep = -1.0) {
        Err(EnvError::Configuration(ConfigError::InvalidOptions { .. })) => {}
        other => panic!("expected InvalidOptions, got {other:?}"),
    }
    assert_eq!(env.state(), EnvState::Stepping);
    assert_eq!(env.get_log().unwrap().steps, 1);
    assert_eq!(env.engine_options().stepper.timestep, 1e-3);
}

#[test]
fn velocity_columns_follow_flag() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    let keys = env.velocity_log_keys().to_vec();
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().all(|k| !env.get_log().unwrap().contains_key(k)));

    env.reset_with(|o| o.telemetry.enable_velocity = true).unwrap();
    env.step(&targets(0.2, -0.1)).unwrap();
    let log = env.get_log().unwrap();
    for key in &keys {
        assert_eq!(log.get(key).map(<[f64]>::len), Some(1));
    }
}

// ── Seeds ───────────────────────────────────────────────────────────

#[test]
fn reset_reuses_latest_seed() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    assert_eq!(env.seed(), 7);
    env.reset_seeded(42, |_| {}).unwrap();
    env.reset().unwrap();
    assert_eq!(env.seed(), 42);
    assert_eq!(env.get_log().unwrap().constant("seed"), Some("42"));
}

// ── Rendering ───────────────────────────────────────────────────────

#[test]
fn render_without_backend_is_unavailable() {
    let mut env = env_with(MockEngine::new(arm()));
    env.reset().unwrap();
    assert!(!env.has_renderer());
    assert_eq!(
        env.render(RenderMode::RgbArray),
        Err(EnvError::RenderUnavailable)
    );
}

#[test]
fn render_delegates_to_backend() {
    let config = EnvConfig::new(MockEngine::new(arm_with_effort()))
        .with_renderer(MockRenderer::new(8, 6, [10, 20, 30]));
    let mut env = Environment::new(config).unwrap();
    env.reset().unwrap();
    let frame = env.render(RenderMode::RgbArray).unwrap();
    assert_eq!(frame.shape(), (8, 6));
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30]));
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn construction_rejects_unknown_gain_override() {
    let mut controller = strider_control::PdConfig::default();
    controller
        .overrides
        .insert("wrist_motor".to_string(), strider_control::PdGains::new(1.0, 0.1));
    let config = EnvConfig::new(MockEngine::new(arm())).with_controller(controller);
    match Environment::new(config) {
        Err(ConfigError::Controller(_)) => {}
        other => panic!("expected Controller error, got {other:?}"),
    }
}
