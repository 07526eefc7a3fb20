//! The joint-space integrator.
//!
//! Each joint obeys
//!
//! ```text
//! I q'' = tau - b q' - k (q - q_rest)
//! ```
//!
//! integrated with semi-implicit Euler. Joint stops clamp the position and
//! zero the velocity. A step is computed into a staging buffer and only
//! committed when every joint stays finite and below the divergence
//! threshold, so a failed step leaves no trace.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strider_core::telemetry::CONTROLLER_NAMESPACE;
use strider_core::{
    Engine, EngineError, EngineOptions, JointState, LogKey, ModelError, RobotModel, SignalClass,
    SignalSpec, StepId, TelemetryOptions, TelemetrySource,
};

/// Deterministic reference engine.
///
/// Owns the model, the options in force, and two state buffers: the
/// committed state and a staging buffer reused by every step.
#[derive(Clone, Debug)]
pub struct JointSpaceEngine {
    model: RobotModel,
    options: EngineOptions,
    /// Joint index driven by each motor.
    motor_joint: Vec<usize>,
    signals: Vec<SignalSpec>,
    state: JointState,
    staging: JointState,
    torques: Vec<f64>,
    steps: StepId,
}

// Compile-time assertion: the engine can be moved into an environment
// running on another thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<JointSpaceEngine>();
    }
};

impl JointSpaceEngine {
    /// Create an engine for `model` with default options.
    ///
    /// The engine starts at the home pose with step 0.
    pub fn new(model: RobotModel) -> Result<Self, ModelError> {
        model.validate()?;
        let motor_joint = model
            .motors
            .iter()
            .map(|m| {
                model
                    .joint_index(&m.joint)
                    .ok_or_else(|| ModelError::UnknownJoint {
                        referenced_by: m.name.clone(),
                        joint: m.joint.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let signals = robot_signals(&model)?;

        let n_joints = model.joints.len();
        let n_motors = model.motors.len();
        let mut state = JointState::zeros(n_joints, n_motors);
        state.positions = model.home_positions();

        Ok(Self {
            staging: state.clone(),
            state,
            torques: vec![0.0; n_joints],
            motor_joint,
            signals,
            options: EngineOptions::default(),
            steps: StepId::default(),
            model,
        })
    }

    /// Create an engine and apply `options` immediately.
    pub fn with_options(model: RobotModel, options: EngineOptions) -> Result<Self, EngineError> {
        let mut engine = Self::new(model).map_err(|e| EngineError::InvalidOptions {
            reason: e.to_string(),
        })?;
        engine.set_options(options)?;
        engine.reset(0)?;
        Ok(engine)
    }

    /// Kinetic energy `sum(0.5 I v^2)` of the committed state.
    pub fn kinetic_energy(&self) -> f64 {
        self.model
            .joints
            .iter()
            .zip(&self.state.velocities)
            .map(|(j, v)| 0.5 * j.inertia * v * v)
            .sum()
    }

    /// Spring potential energy `sum(0.5 k (q - q_rest)^2)` of the committed state.
    pub fn potential_energy(&self) -> f64 {
        self.model
            .joints
            .iter()
            .zip(&self.state.positions)
            .map(|(j, q)| {
                let d = q - j.rest_position;
                0.5 * j.stiffness * d * d
            })
            .sum()
    }
}

impl Engine for JointSpaceEngine {
    fn model(&self) -> &RobotModel {
        &self.model
    }

    fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn set_options(&mut self, options: EngineOptions) -> Result<(), EngineError> {
        options
            .validate()
            .map_err(|reason| EngineError::InvalidOptions { reason })?;
        self.options = options;
        Ok(())
    }

    fn reset(&mut self, seed: u64) -> Result<(), EngineError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noise = self.options.initial_state;
        for (i, joint) in self.model.joints.iter().enumerate() {
            let dq = noise.position_noise * (2.0 * rng.random::<f64>() - 1.0);
            let dv = noise.velocity_noise * (2.0 * rng.random::<f64>() - 1.0);
            self.state.positions[i] =
                (joint.home_position + dq).clamp(joint.lower_limit, joint.upper_limit);
            self.state.velocities[i] = dv;
            self.state.accelerations[i] = 0.0;
        }
        self.state.efforts.fill(0.0);
        self.staging.clone_from(&self.state);
        self.steps = StepId::default();
        tracing::debug!(
            robot = %self.model.name,
            seed,
            "engine reset"
        );
        Ok(())
    }

    fn step(&mut self, command: &[f64]) -> Result<(), EngineError> {
        if command.len() != self.model.motors.len() {
            return Err(EngineError::CommandLength {
                expected: self.model.motors.len(),
                found: command.len(),
            });
        }

        self.torques.fill(0.0);
        for (m, (&u, motor)) in command.iter().zip(&self.model.motors).enumerate() {
            let limit = motor.effort_limit;
            // NaN propagates through clamp and is caught below.
            let applied = u.clamp(-limit, limit);
            self.staging.efforts[m] = applied;
            self.torques[self.motor_joint[m]] += applied;
        }

        let dt = self.options.stepper.timestep;
        let vmax = self.options.stepper.max_velocity;
        for (i, joint) in self.model.joints.iter().enumerate() {
            let q = self.state.positions[i];
            let v = self.state.velocities[i];
            let spring = joint.stiffness * (q - joint.rest_position);
            let a = (self.torques[i] - joint.damping * v - spring) / joint.inertia;
            let mut v_next = v + a * dt;
            let mut q_next = q + v_next * dt;
            if q_next < joint.lower_limit {
                q_next = joint.lower_limit;
                v_next = 0.0;
            } else if q_next > joint.upper_limit {
                q_next = joint.upper_limit;
                v_next = 0.0;
            }
            if !(q_next.is_finite() && v_next.is_finite() && v_next.abs() <= vmax) {
                tracing::warn!(
                    robot = %self.model.name,
                    joint = %joint.name,
                    velocity = v_next,
                    step = self.steps.next().0,
                    "step rejected: joint state diverged"
                );
                self.staging.clone_from(&self.state);
                return Err(EngineError::Diverged {
                    joint: joint.name.clone(),
                    value: v_next,
                });
            }
            self.staging.positions[i] = q_next;
            self.staging.velocities[i] = v_next;
            self.staging.accelerations[i] = a;
        }

        std::mem::swap(&mut self.state, &mut self.staging);
        self.steps = self.steps.next();
        Ok(())
    }

    fn state(&self) -> &JointState {
        &self.state
    }

    fn steps(&self) -> StepId {
        self.steps
    }
}

impl TelemetrySource for JointSpaceEngine {
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
        if options.enable_acceleration {
            out.extend_from_slice(&self.state.accelerations);
        }
        if options.enable_motor_effort {
            out.extend_from_slice(&self.state.efforts);
        }
        if options.enable_energy {
            out.push(self.kinetic_energy());
            out.push(self.potential_energy());
        }
    }
}

/// Robot-state signals in sampling order: positions, velocities,
/// accelerations, efforts, energy.
fn robot_signals(model: &RobotModel) -> Result<Vec<SignalSpec>, ModelError> {
    let key = |signal: String| {
        LogKey::new(CONTROLLER_NAMESPACE, model.name.as_str(), signal.as_str()).map_err(|reason| {
            ModelError::InvalidName {
                name: signal.clone(),
                reason,
            }
        })
    };

    let mut specs = Vec::with_capacity(model.joints.len() * 3 + model.motors.len() + 2);
    for (prefix, class) in [
        ("currentPosition", SignalClass::Configuration),
        ("currentVelocity", SignalClass::Velocity),
        ("currentAcceleration", SignalClass::Acceleration),
    ] {
        for joint in &model.joints {
            specs.push(SignalSpec::new(key(format!("{prefix}_{}", joint.name))?, class));
        }
    }
    for motor in &model.motors {
        specs.push(SignalSpec::new(
            key(format!("currentEffort_{}", motor.name))?,
            SignalClass::MotorEffort,
        ));
    }
    specs.push(SignalSpec::new(key("kineticEnergy".into())?, SignalClass::Energy));
    specs.push(SignalSpec::new(key("potentialEnergy".into())?, SignalClass::Energy));
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strider_core::{EncoderSpec, JointSpec, MotorSpec};

    fn pendulum() -> RobotModel {
        let mut joint = JointSpec::new("pivot", None, 1.0);
        joint.inertia = 2.0;
        joint.damping = 0.0;
        joint.stiffness = 0.0;
        RobotModel {
            name: "pendulum".into(),
            joints: vec![joint],
            motors: vec![MotorSpec {
                name: "pivot_motor".into(),
                joint: "pivot".into(),
                effort_limit: 10.0,
            }],
            encoders: vec![EncoderSpec {
                name: "pivot".into(),
                joint: "pivot".into(),
            }],
            effort_sensors: vec![],
        }
    }

    #[test]
    fn constant_torque_integrates_semi_implicitly() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        engine.reset(0).unwrap();
        engine.step(&[4.0]).unwrap();
        // a = 4 / 2 = 2; v = 2e-3; q = 2e-6.
        assert_relative_eq!(engine.state().accelerations[0], 2.0);
        assert_relative_eq!(engine.state().velocities[0], 2e-3);
        assert_relative_eq!(engine.state().positions[0], 2e-6);
        assert_eq!(engine.steps(), StepId(1));
        assert_relative_eq!(engine.time(), 1e-3);
    }

    #[test]
    fn torque_saturates_at_effort_limit() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        engine.step(&[1e6]).unwrap();
        assert_eq!(engine.state().efforts[0], 10.0);
    }

    #[test]
    fn wrong_command_length_rejected() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        match engine.step(&[]) {
            Err(EngineError::CommandLength {
                expected: 1,
                found: 0,
            }) => {}
            other => panic!("expected CommandLength, got {other:?}"),
        }
        assert_eq!(engine.steps(), StepId(0));
    }

    #[test]
    fn divergence_leaves_state_untouched() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        engine.step(&[1.0]).unwrap();
        let before = engine.state().clone();
        match engine.step(&[f64::NAN]) {
            Err(EngineError::Diverged { joint, .. }) => assert_eq!(joint, "pivot"),
            other => panic!("expected Diverged, got {other:?}"),
        }
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.steps(), StepId(1));
        // The engine keeps working after a rejected step.
        engine.step(&[1.0]).unwrap();
        assert_eq!(engine.steps(), StepId(2));
    }

    #[test]
    fn speed_limit_triggers_divergence() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        let mut options = EngineOptions::default();
        options.stepper.max_velocity = 1e-3;
        engine.set_options(options).unwrap();
        engine.reset(0).unwrap();
        assert!(engine.step(&[0.1]).is_ok());
        assert!(matches!(
            engine.step(&[10.0]),
            Err(EngineError::Diverged { .. })
        ));
    }

    #[test]
    fn joint_stop_clamps_and_zeroes_velocity() {
        let mut model = pendulum();
        model.joints[0].upper_limit = 1e-7;
        let mut engine = JointSpaceEngine::new(model).unwrap();
        engine.step(&[10.0]).unwrap();
        assert_eq!(engine.state().positions[0], 1e-7);
        assert_eq!(engine.state().velocities[0], 0.0);
    }

    #[test]
    fn invalid_options_rejected() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        let mut options = EngineOptions::default();
        options.stepper.timestep = -1.0;
        assert!(matches!(
            engine.set_options(options),
            Err(EngineError::InvalidOptions { .. })
        ));
        assert_eq!(engine.options(), &EngineOptions::default());
    }

    #[test]
    fn reset_noise_is_seeded() {
        let mut engine = JointSpaceEngine::new(pendulum()).unwrap();
        let mut options = EngineOptions::default();
        options.initial_state.position_noise = 0.1;
        options.initial_state.velocity_noise = 0.5;
        engine.set_options(options).unwrap();

        engine.reset(7).unwrap();
        let a = engine.state().clone();
        engine.reset(7).unwrap();
        assert_eq!(engine.state(), &a);
        engine.reset(8).unwrap();
        assert_ne!(engine.state(), &a);
        assert!(a.positions[0].abs() <= 0.1);
        assert!(a.velocities[0].abs() <= 0.5);
    }

    #[test]
    fn sampling_follows_flags() {
        let engine = JointSpaceEngine::new(pendulum()).unwrap();
        let signals = engine.signals();
        assert_eq!(signals.len(), 3 + 1 + 2);
        assert_eq!(
            signals[1].key.to_string(),
            "HighLevelController.pendulum.currentVelocity_pivot"
        );

        let mut out = Vec::new();
        engine.sample(&TelemetryOptions::default(), &mut out);
        // Configuration only.
        assert_eq!(out.len(), 1);

        let all = TelemetryOptions {
            enable_configuration: true,
            enable_velocity: true,
            enable_acceleration: true,
            enable_command: true,
            enable_motor_effort: true,
            enable_energy: true,
        };
        out.clear();
        engine.sample(&all, &mut out);
        let enabled = signals.iter().filter(|s| all.enables(s.class)).count();
        assert_eq!(out.len(), enabled);
    }

    #[test]
    fn energy_tracks_state() {
        let mut model = pendulum();
        model.joints[0].stiffness = 4.0;
        let mut engine = JointSpaceEngine::new(model).unwrap();
        engine.step(&[10.0]).unwrap();
        let v = engine.state().velocities[0];
        let q = engine.state().positions[0];
        assert_relative_eq!(engine.kinetic_energy(), v * v);
        assert_relative_eq!(engine.potential_energy(), 2.0 * q * q);
    }
}
