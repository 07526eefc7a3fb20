//! Collaborator traits: the physics engine and the renderer.
//!
//! The environment owns one of each behind a trait object, so reference
//! implementations, mocks, and external bindings are interchangeable.

use crate::error::{EngineError, RenderError};
use crate::frame::{RenderFrame, RenderMode};
use crate::id::StepId;
use crate::model::RobotModel;
use crate::options::EngineOptions;
use crate::telemetry::TelemetrySource;

/// Joint-space state of the robot after the last completed step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JointState {
    /// Joint angles (rad), in joint order.
    pub positions: Vec<f64>,
    /// Joint velocities (rad/s), in joint order.
    pub velocities: Vec<f64>,
    /// Joint accelerations (rad/s²), in joint order.
    pub accelerations: Vec<f64>,
    /// Applied motor torques (N m), in motor order.
    pub efforts: Vec<f64>,
}

impl JointState {
    /// All-zero state for the given sizes.
    pub fn zeros(joints: usize, motors: usize) -> Self {
        Self {
            positions: vec![0.0; joints],
            velocities: vec![0.0; joints],
            accelerations: vec![0.0; joints],
            efforts: vec![0.0; motors],
        }
    }
}

/// A physics engine advancing one robot in fixed timesteps.
///
/// # Contract
///
/// - `step` is transactional: on `Err` the state, step counter, and
///   telemetry values are exactly as before the call.
/// - `reset` re-establishes the initial state from the model's home pose
///   and the current options; equal seeds give equal states.
/// - The engine's telemetry signals never change between resets.
pub trait Engine: TelemetrySource + Send {
    /// The robot being simulated.
    fn model(&self) -> &RobotModel;

    /// Options currently in force.
    fn options(&self) -> &EngineOptions;

    /// Replace the options. Takes full effect at the next reset.
    fn set_options(&mut self, options: EngineOptions) -> Result<(), EngineError>;

    /// Return to the initial state, drawing any noise from `seed`.
    fn reset(&mut self, seed: u64) -> Result<(), EngineError>;

    /// Advance one timestep with `command` holding one torque per motor.
    fn step(&mut self, command: &[f64]) -> Result<(), EngineError>;

    /// Current joint state.
    fn state(&self) -> &JointState;

    /// Steps completed since reset.
    fn steps(&self) -> StepId;

    /// Simulation time in seconds.
    fn time(&self) -> f64 {
        self.steps().time(self.options().stepper.timestep)
    }
}

/// What a renderer needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneView<'a> {
    /// Robot geometry.
    pub model: &'a RobotModel,
    /// Joint state to draw.
    pub state: &'a JointState,
}

/// Produces images of the current scene.
///
/// Capturing must be a pure function of the scene: two captures of equal
/// scenes yield identical frames.
pub trait Renderer: Send {
    /// Draw `scene` in `mode`.
    fn capture(&self, scene: &SceneView<'_>, mode: RenderMode) -> Result<RenderFrame, RenderError>;

    /// `(width, height)` of frames this renderer produces.
    fn frame_shape(&self) -> (u32, u32);
}
