//! The PD position controller.
//!
//! For motor `i` driving the joint observed by encoder `j`:
//!
//! ```text
//! u_i = kp_i (target_i - q_j) + kd_i (0 - v_j)
//! ```
//!
//! The target velocity is always zero. The encoder index `j` comes from
//! the registry's motor-to-encoder correspondence, never from assuming
//! motors and encoders share an order.

use indexmap::IndexMap;
use strider_core::telemetry::CONTROLLER_NAMESPACE;
use strider_core::{
    Action, ActionError, ChannelGroup, FieldRegistry, LogKey, Observation, SensorData, SensorKind,
    SignalClass, SignalSpec, TelemetryOptions,
};

use crate::config::{PdConfig, PdGains};
use crate::error::ControllerError;

/// Per-motor results of one control computation, in motor order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlOutput {
    /// Commanded joint positions (the action's targets).
    pub target_position: Vec<f64>,
    /// Commanded joint velocities (always zero).
    pub target_velocity: Vec<f64>,
    /// `target_position - measured position`.
    pub position_error: Vec<f64>,
    /// Torque sent to the engine.
    pub command: Vec<f64>,
}

/// Signal names the controller logs for one motor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelSignals {
    /// `targetPosition_<motor>`.
    pub target_position: String,
    /// `targetVelocity_<motor>`.
    pub target_velocity: String,
    /// `positionError_<motor>`.
    pub position_error: String,
    /// `command_<motor>`.
    pub command: String,
}

impl ChannelSignals {
    fn for_motor(motor: &str) -> Self {
        Self {
            target_position: format!("targetPosition_{motor}"),
            target_velocity: format!("targetVelocity_{motor}"),
            position_error: format!("positionError_{motor}"),
            command: format!("command_{motor}"),
        }
    }
}

/// A stateless PD position controller bound to one registry.
#[derive(Clone, Debug)]
pub struct PdController {
    name: String,
    motors: Vec<String>,
    encoder_count: usize,
    motor_to_encoder: Vec<usize>,
    gains: Vec<PdGains>,
    channel_signals: Vec<ChannelSignals>,
    signals: Vec<SignalSpec>,
}

impl PdController {
    /// Bind `config` to `registry`.
    ///
    /// Resolves per-motor gains and copies the motor-to-encoder
    /// correspondence. Fails if the config is invalid, an override names
    /// an unknown motor, or the registry lacks the motor or encoder group
    /// or their correspondence.
    pub fn new(config: PdConfig, registry: &FieldRegistry) -> Result<Self, ControllerError> {
        config.validate()?;
        let motors = registry
            .names(ChannelGroup::Motor)
            .ok_or(ControllerError::MissingGroup {
                group: ChannelGroup::Motor,
            })?
            .to_vec();
        if !registry.contains_group(ChannelGroup::Encoder) {
            return Err(ControllerError::MissingGroup {
                group: ChannelGroup::Encoder,
            });
        }
        let motor_to_encoder = registry
            .correspondence(ChannelGroup::Motor, ChannelGroup::Encoder)
            .ok_or(ControllerError::MissingCorrespondence)?
            .to_vec();
        if let Some(name) = config
            .overrides
            .keys()
            .find(|name| registry.index_of(ChannelGroup::Motor, name).is_none())
        {
            return Err(ControllerError::UnknownMotor { name: name.clone() });
        }

        let gains = motors
            .iter()
            .map(|m| {
                config
                    .overrides
                    .get(m)
                    .copied()
                    .unwrap_or(config.default_gains)
            })
            .collect();
        let channel_signals: Vec<ChannelSignals> =
            motors.iter().map(|m| ChannelSignals::for_motor(m)).collect();
        let signals = declare_signals(&config.name, &channel_signals)?;

        Ok(Self {
            encoder_count: registry.len(ChannelGroup::Encoder),
            name: config.name,
            motors,
            motor_to_encoder,
            gains,
            channel_signals,
            signals,
        })
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Motor channel names in command order.
    pub fn motors(&self) -> &[String] {
        &self.motors
    }

    /// Resolved gains per motor.
    pub fn gains(&self) -> &[PdGains] {
        &self.gains
    }

    /// Encoder column observed for each motor.
    pub fn motor_to_encoder(&self) -> &[usize] {
        &self.motor_to_encoder
    }

    /// Compute torques for `action` from the encoder readings in
    /// `observation`.
    ///
    /// The action must name every motor exactly once and nothing else;
    /// all missing and unexpected names are reported together.
    pub fn compute(
        &self,
        action: &Action,
        observation: &Observation,
    ) -> Result<ControlOutput, ActionError> {
        let targets = self.resolve_targets(action)?;
        let encoders = self.encoder_data(observation)?;
        let q = encoders.row(0);
        let v = encoders.row(1);

        let n = self.motors.len();
        let mut out = ControlOutput {
            target_position: targets,
            target_velocity: vec![0.0; n],
            position_error: Vec::with_capacity(n),
            command: Vec::with_capacity(n),
        };
        for (i, (&j, gains)) in self.motor_to_encoder.iter().zip(&self.gains).enumerate() {
            let error = out.target_position[i] - q[j];
            let velocity_error = out.target_velocity[i] - v[j];
            out.position_error.push(error);
            out.command.push(gains.kp * error + gains.kd * velocity_error);
        }
        Ok(out)
    }

    /// An action targeting the currently measured position of every
    /// motor's joint.
    pub fn hold_action(&self, observation: &Observation) -> Result<Action, ActionError> {
        let q = self.encoder_data(observation)?.row(0);
        Ok(self
            .motors
            .iter()
            .zip(&self.motor_to_encoder)
            .map(|(m, &j)| (m.clone(), q[j]))
            .collect())
    }

    /// Controller signal names keyed by encoder component.
    ///
    /// `"Q"` maps to the per-motor target-position signals and `"V"` to
    /// the per-motor target-velocity signals, both in motor order.
    pub fn get_fieldnames(&self) -> IndexMap<String, Vec<String>> {
        let mut names = IndexMap::with_capacity(2);
        names.insert(
            "Q".to_string(),
            self.channel_signals
                .iter()
                .map(|s| s.target_position.clone())
                .collect(),
        );
        names.insert(
            "V".to_string(),
            self.channel_signals
                .iter()
                .map(|s| s.target_velocity.clone())
                .collect(),
        );
        names
    }

    /// Signal names for one motor.
    pub fn channel_signals(&self, motor: &str) -> Option<&ChannelSignals> {
        let i = self.motors.iter().position(|m| m == motor)?;
        self.channel_signals.get(i)
    }

    /// Full log key for one of this controller's signals.
    pub fn log_key(&self, signal: &str) -> String {
        format!("{CONTROLLER_NAMESPACE}.{}.{signal}", self.name)
    }

    /// Every signal the controller can log, in sampling order.
    pub fn signals(&self) -> &[SignalSpec] {
        &self.signals
    }

    /// Append the enabled signals of `output` to `out`, in
    /// [`signals()`](Self::signals) order.
    pub fn sample(&self, output: &ControlOutput, options: &TelemetryOptions, out: &mut Vec<f64>) {
        out.extend_from_slice(&output.target_position);
        out.extend_from_slice(&output.target_velocity);
        out.extend_from_slice(&output.position_error);
        if options.enables(SignalClass::Command) {
            out.extend_from_slice(&output.command);
        }
    }

    fn resolve_targets(&self, action: &Action) -> Result<Vec<f64>, ActionError> {
        let missing: Vec<String> = self
            .motors
            .iter()
            .filter(|m| !action.contains(m))
            .cloned()
            .collect();
        let unexpected: Vec<String> = action
            .iter()
            .filter(|(name, _)| !self.motors.iter().any(|m| m == *name))
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(ActionError::Mismatch {
                missing,
                unexpected,
            });
        }

        let mut targets = Vec::with_capacity(self.motors.len());
        for motor in &self.motors {
            let value = action.get(motor).unwrap_or(f64::NAN);
            if !value.is_finite() {
                return Err(ActionError::NonFiniteTarget {
                    channel: motor.clone(),
                    value,
                });
            }
            targets.push(value);
        }
        Ok(targets)
    }

    fn encoder_data<'o>(&self, observation: &'o Observation) -> Result<&'o SensorData, ActionError> {
        let data = observation
            .sensor(SensorKind::Encoder)
            .ok_or(ActionError::MissingSensor {
                kind: SensorKind::Encoder,
            })?;
        if data.n_rows() < 2 || data.n_cols() != self.encoder_count {
            return Err(ActionError::MissingSensor {
                kind: SensorKind::Encoder,
            });
        }
        Ok(data)
    }
}

fn declare_signals(
    name: &str,
    channels: &[ChannelSignals],
) -> Result<Vec<SignalSpec>, ControllerError> {
    let key = |signal: &str| {
        LogKey::new(CONTROLLER_NAMESPACE, name, signal).map_err(|reason| {
            ControllerError::InvalidName {
                name: signal.to_string(),
                reason,
            }
        })
    };
    let mut specs = Vec::with_capacity(channels.len() * 4);
    for s in channels {
        specs.push(SignalSpec::new(key(&s.target_position)?, SignalClass::Always));
    }
    for s in channels {
        specs.push(SignalSpec::new(key(&s.target_velocity)?, SignalClass::Always));
    }
    for s in channels {
        specs.push(SignalSpec::new(key(&s.position_error)?, SignalClass::Always));
    }
    for s in channels {
        specs.push(SignalSpec::new(key(&s.command)?, SignalClass::Command));
    }
    Ok(specs)
}
