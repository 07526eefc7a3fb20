//! The environment's error taxonomy.

use std::error::Error;
use std::fmt;

use strider_core::{ActionError, EngineError, RenderError, TelemetryError};

use crate::config::ConfigError;

/// Lifecycle state of an [`Environment`](crate::Environment).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvState {
    /// Constructed, never reset.
    Uninitialized,
    /// Reset; no step taken since.
    Ready,
    /// At least one step taken since the last reset.
    Stepping,
    /// A step failed in the engine or the recorder; only reset recovers.
    Faulted,
}

impl EnvState {
    /// Whether a run exists (the environment has been reset at least once).
    pub fn has_run(self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    /// Whether `step` is allowed.
    pub fn can_step(self) -> bool {
        matches!(self, Self::Ready | Self::Stepping)
    }
}

impl fmt::Display for EnvState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Stepping => "stepping",
            Self::Faulted => "faulted",
        })
    }
}

/// Errors from environment operations.
#[derive(Debug, PartialEq)]
pub enum EnvError {
    /// The operation is not valid in the current state.
    NotReady {
        /// The rejected operation.
        operation: &'static str,
        /// State at the time of the call.
        state: EnvState,
    },
    /// The action does not match the controller's channels.
    ///
    /// Nothing was stepped or recorded.
    InvalidAction(ActionError),
    /// Options or construction-time configuration are invalid.
    Configuration(ConfigError),
    /// The recorder rejected a step's samples; the run is faulted.
    LogInconsistency(TelemetryError),
    /// No renderer is attached.
    RenderUnavailable,
    /// The engine failed to advance; the run is faulted.
    EngineFailure(EngineError),
    /// The renderer failed.
    Render(RenderError),
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady { operation, state } => {
                write!(f, "cannot {operation} while {state}")
            }
            Self::InvalidAction(e) => write!(f, "invalid action: {e}"),
            Self::Configuration(e) => write!(f, "configuration: {e}"),
            Self::LogInconsistency(e) => write!(f, "log inconsistency: {e}"),
            Self::RenderUnavailable => write!(f, "no render backend attached"),
            Self::EngineFailure(e) => write!(f, "engine failure: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
        }
    }
}

impl Error for EnvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAction(e) => Some(e),
            Self::Configuration(e) => Some(e),
            Self::LogInconsistency(e) => Some(e),
            Self::EngineFailure(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::NotReady { .. } | Self::RenderUnavailable => None,
        }
    }
}

impl From<ActionError> for EnvError {
    fn from(e: ActionError) -> Self {
        Self::InvalidAction(e)
    }
}

impl From<ConfigError> for EnvError {
    fn from(e: ConfigError) -> Self {
        Self::Configuration(e)
    }
}

impl From<RenderError> for EnvError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Unavailable => Self::RenderUnavailable,
            other => Self::Render(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_names_operation_and_state() {
        let err = EnvError::NotReady {
            operation: "get_log",
            state: EnvState::Uninitialized,
        };
        assert_eq!(err.to_string(), "cannot get_log while uninitialized");
        assert!(err.source().is_none());
    }

    #[test]
    fn unavailable_render_error_maps_to_variant() {
        assert_eq!(
            EnvError::from(RenderError::Unavailable),
            EnvError::RenderUnavailable
        );
    }

    #[test]
    fn state_predicates() {
        assert!(!EnvState::Uninitialized.has_run());
        assert!(EnvState::Faulted.has_run());
        assert!(!EnvState::Faulted.can_step());
        assert!(EnvState::Ready.can_step());
    }
}
