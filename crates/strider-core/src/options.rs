//! The engine options tree.
//!
//! Options are plain data with defaults. The environment hands a mutable
//! copy to the reset hook, validates the result, and only then applies it
//! to the engine.

use crate::telemetry::SignalClass;

/// Flags selecting which optional signal classes are recorded.
///
/// Fixed for the duration of a run: the log layout is derived from these
/// flags at reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TelemetryOptions {
    /// Record joint positions.
    pub enable_configuration: bool,
    /// Record joint velocities.
    pub enable_velocity: bool,
    /// Record joint accelerations.
    pub enable_acceleration: bool,
    /// Record controller commands.
    pub enable_command: bool,
    /// Record measured motor efforts.
    pub enable_motor_effort: bool,
    /// Record kinetic and potential energy.
    pub enable_energy: bool,
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self {
            enable_configuration: true,
            enable_velocity: false,
            enable_acceleration: false,
            enable_command: true,
            enable_motor_effort: false,
            enable_energy: false,
        }
    }
}

impl TelemetryOptions {
    /// Whether signals of `class` are recorded under these options.
    pub fn enables(&self, class: SignalClass) -> bool {
        match class {
            SignalClass::Always => true,
            SignalClass::Configuration => self.enable_configuration,
            SignalClass::Velocity => self.enable_velocity,
            SignalClass::Acceleration => self.enable_acceleration,
            SignalClass::Command => self.enable_command,
            SignalClass::MotorEffort => self.enable_motor_effort,
            SignalClass::Energy => self.enable_energy,
        }
    }

    /// Flags with their camel-case option names, for log headers.
    pub fn flags(&self) -> [(&'static str, bool); 6] {
        [
            ("enableConfiguration", self.enable_configuration),
            ("enableVelocity", self.enable_velocity),
            ("enableAcceleration", self.enable_acceleration),
            ("enableCommand", self.enable_command),
            ("enableMotorEffort", self.enable_motor_effort),
            ("enableEnergy", self.enable_energy),
        ]
    }
}

/// Integration settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepperOptions {
    /// Fixed step duration in seconds.
    pub timestep: f64,
    /// Joint speed (rad/s) above which a step is treated as diverged.
    pub max_velocity: f64,
}

impl Default for StepperOptions {
    fn default() -> Self {
        Self {
            timestep: 1e-3,
            max_velocity: 1e3,
        }
    }
}

/// Perturbation applied to the home pose at reset.
///
/// Noise is uniform in `[-n, n]` and drawn from the reset seed, so equal
/// seeds give equal initial states.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InitialStateOptions {
    /// Half-width of the position perturbation (rad).
    pub position_noise: f64,
    /// Half-width of the velocity perturbation (rad/s).
    pub velocity_noise: f64,
}

/// Root of the options tree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineOptions {
    /// Telemetry flags.
    pub telemetry: TelemetryOptions,
    /// Integration settings.
    pub stepper: StepperOptions,
    /// Initial-state perturbation.
    pub initial_state: InitialStateOptions,
}

impl EngineOptions {
    /// Check every numeric setting.
    pub fn validate(&self) -> Result<(), String> {
        let dt = self.stepper.timestep;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(format!("stepper.timestep must be finite and > 0, got {dt}"));
        }
        let vmax = self.stepper.max_velocity;
        if vmax.is_nan() || vmax <= 0.0 {
            return Err(format!("stepper.max_velocity must be > 0, got {vmax}"));
        }
        for (name, value) in [
            ("initial_state.position_noise", self.initial_state.position_noise),
            ("initial_state.velocity_noise", self.initial_state.velocity_noise),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        Ok(())
    }
}
