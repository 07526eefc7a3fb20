//! Controller configuration.

use indexmap::IndexMap;
use strider_core::telemetry::check_segment;

use crate::error::ControllerError;

/// Proportional and derivative gains for one motor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PdGains {
    /// Torque per radian of position error.
    pub kp: f64,
    /// Torque per rad/s of velocity error.
    pub kd: f64,
}

impl PdGains {
    /// Convenience constructor.
    pub fn new(kp: f64, kd: f64) -> Self {
        Self { kp, kd }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, value) in [("kp", self.kp), ("kd", self.kd)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        Ok(())
    }
}

impl Default for PdGains {
    fn default() -> Self {
        Self { kp: 200.0, kd: 20.0 }
    }
}

/// Configuration for a [`PdController`](crate::PdController).
#[derive(Clone, Debug, PartialEq)]
pub struct PdConfig {
    /// Controller instance name; the middle segment of its log keys.
    pub name: String,
    /// Gains for motors without an override.
    pub default_gains: PdGains,
    /// Per-motor gains keyed by motor channel name.
    pub overrides: IndexMap<String, PdGains>,
}

impl Default for PdConfig {
    fn default() -> Self {
        Self {
            name: "pd".to_string(),
            default_gains: PdGains::default(),
            overrides: IndexMap::new(),
        }
    }
}

impl PdConfig {
    /// Check the instance name and every gain.
    ///
    /// Whether overrides name real motors is checked against the registry
    /// when the controller is built.
    pub fn validate(&self) -> Result<(), ControllerError> {
        check_segment(&self.name).map_err(|reason| ControllerError::InvalidName {
            name: self.name.clone(),
            reason,
        })?;
        self.default_gains
            .validate()
            .map_err(|reason| ControllerError::InvalidGain {
                motor: None,
                reason,
            })?;
        for (motor, gains) in &self.overrides {
            gains
                .validate()
                .map_err(|reason| ControllerError::InvalidGain {
                    motor: Some(motor.clone()),
                    reason,
                })?;
        }
        Ok(())
    }
}
