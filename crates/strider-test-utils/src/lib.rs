//! Test utilities and mock collaborators for Strider development.
//!
//! Provides a scriptable [`MockEngine`], a flat-colour [`MockRenderer`],
//! and small robot [`fixtures`] for exercising the controller, the
//! recorder, and the environment without the reference physics.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use strider_core::telemetry::CONTROLLER_NAMESPACE;
use strider_core::{
    Engine, EngineError, EngineOptions, JointState, LogKey, RenderError, RenderFrame, RenderMode,
    Renderer, RobotModel, SceneView, SignalClass, SignalSpec, StepId, TelemetryOptions,
    TelemetrySource,
};

/// Engine with first-order dynamics: each motor's command is its joint's
/// velocity for the step.
///
/// Failure and telemetry misbehaviour are scripted through the builder
/// methods. Invalid models are not checked; build fixtures from
/// [`fixtures`].
pub struct MockEngine {
    model: RobotModel,
    options: EngineOptions,
    signals: Vec<SignalSpec>,
    motor_joint: Vec<usize>,
    state: JointState,
    steps: StepId,
    fail_at: Option<u64>,
    reset_limit: Option<usize>,
    extra_samples: usize,
    /// Number of successful `reset` calls.
    pub resets: usize,
    /// Seed of the most recent `reset`.
    pub last_seed: Option<u64>,
}

impl MockEngine {
    pub fn new(model: RobotModel) -> Self {
        let motor_joint = model
            .motors
            .iter()
            .map(|m| model.joint_index(&m.joint).unwrap_or(0))
            .collect();
        let mut signals = Vec::with_capacity(model.joints.len() * 2);
        for (prefix, class) in [
            ("currentPosition", SignalClass::Configuration),
            ("currentVelocity", SignalClass::Velocity),
        ] {
            for joint in &model.joints {
                let signal = format!("{prefix}_{}", joint.name);
                if let Ok(key) = LogKey::new(CONTROLLER_NAMESPACE, model.name.as_str(), signal) {
                    signals.push(SignalSpec::new(key, class));
                }
            }
        }
        let mut state = JointState::zeros(model.joints.len(), model.motors.len());
        state.positions = model.home_positions();
        Self {
            model,
            options: EngineOptions::default(),
            signals,
            motor_joint,
            state,
            steps: StepId::default(),
            fail_at: None,
            reset_limit: None,
            extra_samples: 0,
            resets: 0,
            last_seed: None,
        }
    }

    /// Fail with `Terminated` when asked to produce step `step`.
    pub fn failing_at(mut self, step: u64) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Refuse every `reset` after `n` successful ones, leaving the state
    /// and step counter untouched.
    pub fn failing_reset_after(mut self, n: usize) -> Self {
        self.reset_limit = Some(n);
        self
    }

    /// Append `n` undeclared values to every sample.
    pub fn with_extra_samples(mut self, n: usize) -> Self {
        self.extra_samples = n;
        self
    }
}

impl TelemetrySource for MockEngine {
    fn signals(&self) -> Vec<SignalSpec> {
        self.signals.clone()
    }

    fn sample(&self, options: &TelemetryOptions, out: &mut Vec<f64>) {
        if options.enable_configuration {
            out.extend_from_slice(&self.state.positions);
        }
        if options.enable_velocity {
            out.extend_from_slice(&self.state.velocities);
        }
        out.extend(std::iter::repeat_n(0.0, self.extra_samples));
    }
}

impl Engine for MockEngine {
    fn model(&self) -> &RobotModel {
        &self.model
    }

    fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn set_options(&mut self, options: EngineOptions) -> Result<(), EngineError> {
        self.options = options;
        Ok(())
    }

    fn reset(&mut self, seed: u64) -> Result<(), EngineError> {
        if self.reset_limit.is_some_and(|n| self.resets >= n) {
            return Err(EngineError::Terminated {
                reason: format!("scripted reset failure after {} resets", self.resets),
            });
        }
        self.state = JointState::zeros(self.model.joints.len(), self.model.motors.len());
        self.state.positions = self.model.home_positions();
        self.steps = StepId::default();
        self.resets += 1;
        self.last_seed = Some(seed);
        Ok(())
    }

    fn step(&mut self, command: &[f64]) -> Result<(), EngineError> {
        if command.len() != self.motor_joint.len() {
            return Err(EngineError::CommandLength {
                expected: self.motor_joint.len(),
                found: command.len(),
            });
        }
        let next = self.steps.next();
        if self.fail_at == Some(next.0) {
            return Err(EngineError::Terminated {
                reason: format!("scripted failure at step {}", next.0),
            });
        }
        let dt = self.options.stepper.timestep;
        self.state.velocities.iter_mut().for_each(|v| *v = 0.0);
        for (&u, &j) in command.iter().zip(&self.motor_joint) {
            self.state.velocities[j] = u;
            self.state.positions[j] += dt * u;
        }
        self.state.efforts.copy_from_slice(command);
        self.steps = next;
        Ok(())
    }

    fn state(&self) -> &JointState {
        &self.state
    }

    fn steps(&self) -> StepId {
        self.steps
    }
}

/// Renderer that fills the whole frame with one colour.
#[derive(Clone, Debug)]
pub struct MockRenderer {
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

impl MockRenderer {
    pub fn new(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            width,
            height,
            color,
        }
    }
}

impl Renderer for MockRenderer {
    fn capture(&self, _scene: &SceneView<'_>, mode: RenderMode) -> Result<RenderFrame, RenderError> {
        match mode {
            RenderMode::RgbArray => {
                let n = self.width as usize * self.height as usize;
                RenderFrame::new(self.width, self.height, self.color.repeat(n))
            }
        }
    }

    fn frame_shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
