//! Environment configuration, validation, and error types.
//!
//! [`EnvConfig`] bundles the collaborators (engine, optional renderer)
//! with the controller configuration, the initial options tree, and the
//! default seed. [`validate()`](EnvConfig::validate) checks everything
//! that can be checked without building the environment.

use std::error::Error;
use std::fmt;

use strider_control::{ControllerError, PdConfig};
use strider_core::{
    Engine, EngineError, EngineOptions, ModelError, RegistryError, Renderer, TelemetryError,
};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building an environment or applying options.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The engine's robot model is inconsistent.
    Model(ModelError),
    /// The field registry could not be built from the model.
    Registry(RegistryError),
    /// The controller configuration is invalid for this registry.
    Controller(ControllerError),
    /// The telemetry layout could not be built.
    Telemetry(TelemetryError),
    /// The engine refused the options tree.
    Engine(EngineError),
    /// An options value is out of range.
    InvalidOptions {
        /// Description of the violation.
        reason: String,
    },
    /// Telemetry options were changed while a run is in progress.
    TelemetryLocked,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(e) => write!(f, "model: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Controller(e) => write!(f, "controller: {e}"),
            Self::Telemetry(e) => write!(f, "telemetry: {e}"),
            Self::Engine(e) => write!(f, "engine: {e}"),
            Self::InvalidOptions { reason } => write!(f, "invalid options: {reason}"),
            Self::TelemetryLocked => {
                write!(f, "telemetry options cannot change during a run; reset first")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            Self::Registry(e) => Some(e),
            Self::Controller(e) => Some(e),
            Self::Telemetry(e) => Some(e),
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

impl From<RegistryError> for ConfigError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<ControllerError> for ConfigError {
    fn from(e: ControllerError) -> Self {
        Self::Controller(e)
    }
}

impl From<TelemetryError> for ConfigError {
    fn from(e: TelemetryError) -> Self {
        Self::Telemetry(e)
    }
}

impl From<EngineError> for ConfigError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

// ── EnvConfig ──────────────────────────────────────────────────────

/// Complete configuration for constructing an
/// [`Environment`](crate::Environment).
pub struct EnvConfig {
    /// Physics collaborator. Its model defines the registry.
    pub engine: Box<dyn Engine>,
    /// Visual collaborator; `None` makes `render` fail with
    /// `RenderUnavailable`.
    pub renderer: Option<Box<dyn Renderer>>,
    /// Controller configuration.
    pub controller: PdConfig,
    /// Options staged for the first reset.
    pub options: EngineOptions,
    /// Seed for initial-state noise until a reset supplies another.
    pub seed: u64,
}

impl EnvConfig {
    /// Defaults around `engine`: no renderer, default controller and
    /// options, seed 0.
    pub fn new(engine: impl Engine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
            renderer: None,
            controller: PdConfig::default(),
            options: EngineOptions::default(),
            seed: 0,
        }
    }

    /// Attach a renderer.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Replace the controller configuration.
    pub fn with_controller(mut self, controller: PdConfig) -> Self {
        self.controller = controller;
        self
    }

    /// Replace the initial options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the default seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the model, the options, and the controller configuration.
    ///
    /// Cross-checks that need the registry (gain overrides, duplicate log
    /// keys) run when the environment is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.model().validate()?;
        self.options
            .validate()
            .map_err(|reason| ConfigError::InvalidOptions { reason })?;
        self.controller.validate()?;
        Ok(())
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("robot", &self.engine.model().name)
            .field("renderer", &self.renderer.is_some())
            .field("controller", &self.controller)
            .field("options", &self.options)
            .field("seed", &self.seed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_sim::{biped, JointSpaceEngine};

    fn config() -> EnvConfig {
        EnvConfig::new(JointSpaceEngine::new(biped()).unwrap())
    }

    #[test]
    fn default_config_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn bad_options_rejected() {
        let mut options = EngineOptions::default();
        options.stepper.timestep = 0.0;
        match config().with_options(options).validate() {
            Err(ConfigError::InvalidOptions { .. }) => {}
            other => panic!("expected InvalidOptions, got {other:?}"),
        }
    }

    #[test]
    fn bad_controller_rejected() {
        let controller = PdConfig {
            name: String::new(),
            ..PdConfig::default()
        };
        assert!(matches!(
            config().with_controller(controller).validate(),
            Err(ConfigError::Controller(_))
        ));
    }

    #[test]
    fn source_chain_reaches_subsystem_error() {
        let err = ConfigError::from(RegistryError::UnknownGroup {
            group: strider_core::ChannelGroup::Motor,
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("registry: "));
    }
}
