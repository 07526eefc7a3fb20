//! The reset/step orchestrator.
//!
//! [`Environment`] owns the engine, the optional renderer, the field
//! registry, the controller, the sensor adapters, and the telemetry
//! recorder, and sequences them through a deterministic lifecycle:
//!
//! ```text
//! Uninitialized --reset--> Ready --step--> Stepping --reset--> Ready
//!                                  \          |
//!                                   +---------+--(engine/log fault)--> Faulted --reset--> Ready
//! ```
//!
//! # Ownership model
//!
//! `Environment` is [`Send`] but all mutating methods take `&mut self`,
//! so the borrow checker serializes access; there is no internal locking.
//! Observations and log records are owned copies and stay valid across
//! later steps.

use std::time::Instant;

use indexmap::IndexMap;
use strider_control::PdController;
use strider_core::telemetry::GLOBAL_NAMESPACE;
use strider_core::{
    Action, Engine, EngineOptions, FieldRegistry, LogKey, Observation, RenderFrame, RenderMode,
    Renderer, SceneView, SignalClass, SignalSpec, StepId, TelemetryError, TelemetryOptions,
};
use strider_telemetry::{LogLayout, LogRecord, Recorder, SampleFrame};

use crate::config::{ConfigError, EnvConfig};
use crate::error::{EnvError, EnvState};
use crate::metrics::StepMetrics;
use crate::sensor::{EffortAdapter, EncoderAdapter, SensorAdapter};

// Compile-time assertion: Environment is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Environment>();
    }
};

/// Instance segment of the clock's log key.
const CLOCK_INSTANCE: &str = "stepper";
/// Signal segment of the clock's log key.
const CLOCK_SIGNAL: &str = "Time";

// Layout source order.
const CLOCK_SOURCE: usize = 0;
const CONTROLLER_SOURCE: usize = 1;
const ENGINE_SOURCE: usize = 2;

/// A single controlled robot with its telemetry and rendering.
pub struct Environment {
    engine: Box<dyn Engine>,
    renderer: Option<Box<dyn Renderer>>,
    registry: FieldRegistry,
    controller: PdController,
    adapters: Vec<Box<dyn SensorAdapter>>,
    clock_signals: Vec<SignalSpec>,
    velocity_log_keys: Vec<String>,
    recorder: Recorder,
    frame: SampleFrame,
    options: EngineOptions,
    observation: Option<Observation>,
    state: EnvState,
    seed: u64,
    last_metrics: StepMetrics,
}

impl Environment {
    /// Build an environment from `config`.
    ///
    /// Validates the model and options, builds the field registry
    /// (encoder, effort, and motor groups with the motor-to-encoder
    /// correspondence), binds the controller and sensor adapters, and
    /// checks that the telemetry layout for the initial options is
    /// consistent. The environment starts `Uninitialized`.
    pub fn new(config: EnvConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let EnvConfig {
            engine,
            renderer,
            controller,
            options,
            seed,
        } = config;

        let model = engine.model();
        let registry = model.registry()?;
        let controller = PdController::new(controller, &registry)?;
        let mut adapters: Vec<Box<dyn SensorAdapter>> =
            vec![Box::new(EncoderAdapter::new(model, &registry)?)];
        if !model.effort_sensors.is_empty() {
            adapters.push(Box::new(EffortAdapter::new(model, &registry)?));
        }
        let clock = LogKey::new(GLOBAL_NAMESPACE, CLOCK_INSTANCE, CLOCK_SIGNAL).map_err(|reason| {
            TelemetryError::InvalidKey {
                key: format!("{GLOBAL_NAMESPACE}.{CLOCK_INSTANCE}.{CLOCK_SIGNAL}"),
                reason,
            }
        })?;
        let velocity_log_keys = engine
            .signals()
            .into_iter()
            .filter(|s| s.class == SignalClass::Velocity)
            .map(|s| s.key.to_string())
            .collect();

        let env = Self {
            engine,
            renderer,
            registry,
            controller,
            adapters,
            clock_signals: vec![SignalSpec::new(clock, SignalClass::Always)],
            velocity_log_keys,
            recorder: Recorder::new(),
            frame: SampleFrame::default(),
            options,
            observation: None,
            state: EnvState::Uninitialized,
            seed,
            last_metrics: StepMetrics::default(),
        };
        env.build_layout(&options.telemetry)?;
        tracing::debug!(
            robot = %env.engine.model().name,
            controller = env.controller.name(),
            motors = env.controller.motors().len(),
            "environment created"
        );
        Ok(env)
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Start a new run with the staged options and the current seed.
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        self.reset_seeded(self.seed, |_| {})
    }

    /// Start a new run after letting `configure` edit the staged options.
    ///
    /// `configure` receives a copy; the edited tree is validated and only
    /// then applied and kept as the staged options.
    pub fn reset_with<F>(&mut self, configure: F) -> Result<Observation, EnvError>
    where
        F: FnOnce(&mut EngineOptions),
    {
        self.reset_seeded(self.seed, configure)
    }

    /// Start a new run with an explicit seed for initial-state noise.
    ///
    /// On a configuration error nothing changes: the previous run, its
    /// log, and the staged options are all kept. If the engine itself fails
    /// to reset, the environment faults but the staged options, the log,
    /// and the engine's options still belong to the previous run.
    pub fn reset_seeded<F>(&mut self, seed: u64, configure: F) -> Result<Observation, EnvError>
    where
        F: FnOnce(&mut EngineOptions),
    {
        let mut options = self.options;
        configure(&mut options);
        options
            .validate()
            .map_err(|reason| ConfigError::InvalidOptions { reason })?;
        let layout = self.build_layout(&options.telemetry)?;
        let previous = *self.engine.options();
        self.engine
            .set_options(options)
            .map_err(ConfigError::Engine)?;

        if let Err(e) = self.engine.reset(seed) {
            tracing::warn!(error = %e, seed, "engine reset failed");
            // The failed run's options never take effect; the log and the
            // clock keep describing the previous run.
            if let Err(restore) = self.engine.set_options(previous) {
                tracing::warn!(error = %restore, "could not restore engine options");
            }
            self.observation = None;
            self.state = EnvState::Faulted;
            return Err(EnvError::EngineFailure(e));
        }
        self.options = options;
        self.seed = seed;
        self.frame = SampleFrame::for_layout(&layout);
        let constants = self.constants(&options);
        self.recorder.begin(layout, constants);
        self.last_metrics = StepMetrics::default();

        let observation = self.observe();
        self.observation = Some(observation.clone());
        self.state = EnvState::Ready;
        tracing::info!(
            robot = %self.engine.model().name,
            seed,
            timestep = options.stepper.timestep,
            "environment reset"
        );
        Ok(observation)
    }

    /// Advance one timestep toward the targets in `action`.
    ///
    /// An invalid action is rejected before anything runs. An engine
    /// failure or a log inconsistency faults the run; only a reset
    /// recovers from that.
    pub fn step(&mut self, action: &Action) -> Result<Observation, EnvError> {
        if !self.state.can_step() {
            return Err(self.not_ready("step"));
        }
        let Some(current) = self.observation.as_ref() else {
            return Err(self.not_ready("step"));
        };

        let start = Instant::now();
        let output = self.controller.compute(action, current)?;
        let control_us = start.elapsed().as_micros() as u64;

        let engine_start = Instant::now();
        if let Err(e) = self.engine.step(&output.command) {
            tracing::warn!(
                error = %e,
                step = self.engine.steps().next().0,
                "engine step failed, run faulted"
            );
            self.state = EnvState::Faulted;
            return Err(EnvError::EngineFailure(e));
        }
        let engine_us = engine_start.elapsed().as_micros() as u64;

        let observe_start = Instant::now();
        let observation = self.observe();
        let observe_us = observe_start.elapsed().as_micros() as u64;

        let telemetry_start = Instant::now();
        let options = self
            .recorder
            .options()
            .copied()
            .unwrap_or(self.options.telemetry);
        self.frame.clear();
        if let Some(out) = self.frame.source_mut(CLOCK_SOURCE) {
            out.push(observation.time);
        }
        if let Some(out) = self.frame.source_mut(CONTROLLER_SOURCE) {
            self.controller.sample(&output, &options, out);
        }
        if let Some(out) = self.frame.source_mut(ENGINE_SOURCE) {
            self.engine.sample(&options, out);
        }
        if let Err(e) = self.recorder.record(observation.step, &self.frame) {
            tracing::warn!(error = %e, step = observation.step.0, "telemetry rejected, run faulted");
            self.state = EnvState::Faulted;
            return Err(EnvError::LogInconsistency(e));
        }
        let telemetry_us = telemetry_start.elapsed().as_micros() as u64;

        self.last_metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            control_us,
            engine_us,
            observe_us,
            telemetry_us,
            signals_recorded: self.frame_len(),
        };
        self.observation = Some(observation.clone());
        self.state = EnvState::Stepping;
        Ok(observation)
    }

    /// Capture the current scene.
    pub fn render(&self, mode: RenderMode) -> Result<RenderFrame, EnvError> {
        if !self.state.has_run() {
            return Err(self.not_ready("render"));
        }
        let renderer = self.renderer.as_ref().ok_or(EnvError::RenderUnavailable)?;
        let scene = SceneView {
            model: self.engine.model(),
            state: self.engine.state(),
        };
        Ok(renderer.capture(&scene, mode)?)
    }

    /// A copy of the current run's log.
    pub fn get_log(&self) -> Result<LogRecord, EnvError> {
        if !self.state.has_run() {
            return Err(self.not_ready("get_log"));
        }
        self.recorder.finalize().map_err(EnvError::LogInconsistency)
    }

    // ── Options ─────────────────────────────────────────────────

    /// Options staged for the next reset.
    pub fn engine_options(&self) -> &EngineOptions {
        &self.options
    }

    /// Stage options for the next reset.
    ///
    /// During a run the telemetry branch is fixed: a tree whose telemetry
    /// flags differ from the run's is rejected.
    pub fn set_engine_options(&mut self, options: EngineOptions) -> Result<(), EnvError> {
        options
            .validate()
            .map_err(|reason| ConfigError::InvalidOptions { reason })?;
        if let Some(active) = self.recorder.options() {
            if *active != options.telemetry {
                return Err(ConfigError::TelemetryLocked.into());
            }
        }
        self.build_layout(&options.telemetry)?;
        self.options = options;
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The controller.
    pub fn controller(&self) -> &PdController {
        &self.controller
    }

    /// The field registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// The engine.
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Lifecycle state.
    pub fn state(&self) -> EnvState {
        self.state
    }

    /// Steps completed in the current run.
    pub fn current_step(&self) -> StepId {
        self.engine.steps()
    }

    /// Simulation time of the current run.
    pub fn time(&self) -> f64 {
        self.engine.time()
    }

    /// The latest observation, if a run exists.
    pub fn observation(&self) -> Option<&Observation> {
        self.observation.as_ref()
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Seed of the current run (or the configured seed before any reset).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Log keys of every robot joint-velocity signal.
    ///
    /// Present in the log only when velocity telemetry is enabled.
    pub fn velocity_log_keys(&self) -> &[String] {
        &self.velocity_log_keys
    }

    /// Whether a renderer is attached.
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    // ── Internals ───────────────────────────────────────────────

    fn build_layout(&self, telemetry: &TelemetryOptions) -> Result<LogLayout, ConfigError> {
        Ok(LogLayout::builder(*telemetry)
            .source(CLOCK_INSTANCE, self.clock_signals.clone())
            .source(self.controller.name(), self.controller.signals().to_vec())
            .source(self.engine.model().name.as_str(), self.engine.signals())
            .build()?)
    }

    fn observe(&self) -> Observation {
        let sensors = self
            .adapters
            .iter()
            .map(|a| (a.kind(), a.read(self.engine.as_ref())))
            .collect();
        Observation {
            step: self.engine.steps(),
            time: self.engine.time(),
            sensors,
        }
    }

    fn constants(&self, options: &EngineOptions) -> IndexMap<String, String> {
        let mut constants = IndexMap::new();
        constants.insert("robot".to_string(), self.engine.model().name.clone());
        constants.insert("controller".to_string(), self.controller.name().to_string());
        constants.insert("seed".to_string(), self.seed.to_string());
        constants.insert("timestep".to_string(), options.stepper.timestep.to_string());
        constants.insert(
            "maxVelocity".to_string(),
            options.stepper.max_velocity.to_string(),
        );
        for (flag, enabled) in options.telemetry.flags() {
            constants.insert(format!("telemetry.{flag}"), enabled.to_string());
        }
        constants
    }

    fn frame_len(&self) -> usize {
        (0..self.frame.source_count())
            .filter_map(|i| self.frame.source(i))
            .map(<[f64]>::len)
            .sum()
    }

    fn not_ready(&self, operation: &'static str) -> EnvError {
        EnvError::NotReady {
            operation,
            state: self.state,
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("robot", &self.engine.model().name)
            .field("state", &self.state)
            .field("current_step", &self.engine.steps())
            .field("seed", &self.seed)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
