//! Controller construction errors.

use std::error::Error;
use std::fmt;

use strider_core::ChannelGroup;

/// Errors from validating a [`PdConfig`](crate::PdConfig) or binding it to
/// a registry.
#[derive(Clone, Debug, PartialEq)]
pub enum ControllerError {
    /// The instance name cannot be used as a log key segment.
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A gain is negative or not finite.
    InvalidGain {
        /// Motor whose override is bad, or `None` for the default gains.
        motor: Option<String>,
        /// Description of the violation.
        reason: String,
    },
    /// A gain override names a motor the registry does not know.
    UnknownMotor {
        /// The unknown name.
        name: String,
    },
    /// The registry lacks a group the controller needs.
    MissingGroup {
        /// The absent group.
        group: ChannelGroup,
    },
    /// The registry has no motor-to-encoder correspondence.
    MissingCorrespondence,
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name, reason } => {
                write!(f, "invalid controller name '{name}': {reason}")
            }
            Self::InvalidGain {
                motor: Some(motor),
                reason,
            } => write!(f, "invalid gains for '{motor}': {reason}"),
            Self::InvalidGain {
                motor: None,
                reason,
            } => write!(f, "invalid default gains: {reason}"),
            Self::UnknownMotor { name } => write!(f, "gain override for unknown motor '{name}'"),
            Self::MissingGroup { group } => write!(f, "registry has no {group} group"),
            Self::MissingCorrespondence => {
                write!(f, "registry has no motor to encoder correspondence")
            }
        }
    }
}

impl Error for ControllerError {}
