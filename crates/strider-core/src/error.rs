//! Error types for the Strider control pipeline.
//!
//! Organized by subsystem: registry and model construction, action
//! validation, engine stepping, telemetry recording, and rendering. The
//! environment crate wraps these into its top-level `EnvError` taxonomy.

use std::error::Error;
use std::fmt;

use crate::id::StepId;
use crate::observation::SensorKind;
use crate::registry::ChannelGroup;

/// Errors from building a [`FieldRegistry`](crate::FieldRegistry).
///
/// All of these are construction-time failures; a built registry is
/// immutable and never produces them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The same channel group was registered twice.
    DuplicateGroup {
        /// The repeated group.
        group: ChannelGroup,
    },
    /// A correspondence names a group that was never registered.
    UnknownGroup {
        /// The missing group.
        group: ChannelGroup,
    },
    /// A channel name is not a valid identifier segment.
    InvalidName {
        /// Group the channel belongs to.
        group: ChannelGroup,
        /// The offending name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },
    /// Two channels in one group share a name.
    DuplicateName {
        /// Group containing the duplicate.
        group: ChannelGroup,
        /// The repeated name.
        name: String,
    },
    /// A correspondence was requested between groups of different sizes.
    CardinalityMismatch {
        /// Source group of the correspondence.
        from: ChannelGroup,
        /// Target group of the correspondence.
        to: ChannelGroup,
        /// Number of channels in `from`.
        from_len: usize,
        /// Number of channels in `to`.
        to_len: usize,
    },
    /// A channel has no unclaimed counterpart in the target group.
    UnmatchedChannel {
        /// Source group of the correspondence.
        from: ChannelGroup,
        /// Target group of the correspondence.
        to: ChannelGroup,
        /// The channel in `from` left without a partner.
        name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateGroup { group } => write!(f, "group {group} registered twice"),
            Self::UnknownGroup { group } => write!(f, "group {group} is not registered"),
            Self::InvalidName {
                group,
                name,
                reason,
            } => write!(f, "invalid {group} channel name '{name}': {reason}"),
            Self::DuplicateName { group, name } => {
                write!(f, "duplicate {group} channel name '{name}'")
            }
            Self::CardinalityMismatch {
                from,
                to,
                from_len,
                to_len,
            } => write!(
                f,
                "cannot map {from} ({from_len} channels) onto {to} ({to_len} channels)"
            ),
            Self::UnmatchedChannel { from, to, name } => {
                write!(f, "{from} channel '{name}' has no counterpart in {to}")
            }
        }
    }
}

impl Error for RegistryError {}

/// Errors from [`RobotModel::validate()`](crate::RobotModel::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// The model declares no joints.
    NoJoints,
    /// The model or one of its parts has an unusable name.
    InvalidName {
        /// The offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Two joints, motors, or sensors share a name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// A motor or encoder references a joint that does not exist.
    UnknownJoint {
        /// The referencing motor or sensor.
        referenced_by: String,
        /// The missing joint name.
        joint: String,
    },
    /// An effort sensor references a motor that does not exist.
    UnknownMotor {
        /// The referencing sensor.
        referenced_by: String,
        /// The missing motor name.
        motor: String,
    },
    /// A joint's parent index does not precede it in the joint list.
    InvalidParent {
        /// The joint with the bad parent.
        joint: String,
        /// The parent index it declared.
        parent: usize,
    },
    /// A physical parameter is out of range.
    InvalidParameter {
        /// The joint or motor the parameter belongs to.
        owner: String,
        /// Description of the violation.
        reason: String,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoJoints => write!(f, "model declares no joints"),
            Self::InvalidName { name, reason } => write!(f, "invalid name '{name}': {reason}"),
            Self::DuplicateName { name } => write!(f, "duplicate name '{name}'"),
            Self::UnknownJoint {
                referenced_by,
                joint,
            } => write!(f, "'{referenced_by}' references unknown joint '{joint}'"),
            Self::UnknownMotor {
                referenced_by,
                motor,
            } => write!(f, "'{referenced_by}' references unknown motor '{motor}'"),
            Self::InvalidParent { joint, parent } => {
                write!(f, "joint '{joint}' has parent index {parent} that does not precede it")
            }
            Self::InvalidParameter { owner, reason } => write!(f, "'{owner}': {reason}"),
        }
    }
}

impl Error for ModelError {}

/// Errors from validating an [`Action`](crate::Action) against a controller.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionError {
    /// The action's channel names do not exactly match the expected set.
    Mismatch {
        /// Expected channels the action does not name, in channel order.
        missing: Vec<String>,
        /// Names in the action that are not controller channels.
        unexpected: Vec<String>,
    },
    /// A target value is NaN or infinite.
    NonFiniteTarget {
        /// The channel carrying the bad target.
        channel: String,
        /// The rejected value.
        value: f64,
    },
    /// The observation lacks a sensor kind the controller reads.
    MissingSensor {
        /// The absent sensor kind.
        kind: SensorKind,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch {
                missing,
                unexpected,
            } => {
                write!(f, "action channels do not match controller")?;
                if !missing.is_empty() {
                    write!(f, "; missing [{}]", missing.join(", "))?;
                }
                if !unexpected.is_empty() {
                    write!(f, "; unexpected [{}]", unexpected.join(", "))?;
                }
                Ok(())
            }
            Self::NonFiniteTarget { channel, value } => {
                write!(f, "target for '{channel}' is not finite: {value}")
            }
            Self::MissingSensor { kind } => write!(f, "observation has no {kind} data"),
        }
    }
}

impl Error for ActionError {}

/// Errors reported by an [`Engine`](crate::Engine) collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The integrated state left the finite/bounded region.
    ///
    /// The engine rejects the step and keeps its previous state.
    Diverged {
        /// Joint whose state diverged first.
        joint: String,
        /// The offending velocity (may be NaN).
        value: f64,
    },
    /// The command vector does not have one entry per motor.
    CommandLength {
        /// Number of motors.
        expected: usize,
        /// Length supplied.
        found: usize,
    },
    /// The engine refused an options tree.
    InvalidOptions {
        /// Description of the problem.
        reason: String,
    },
    /// The engine ended the run on its own (collaborator-reported).
    Terminated {
        /// Description supplied by the engine.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diverged { joint, value } => {
                write!(f, "state diverged at joint '{joint}' (velocity {value})")
            }
            Self::CommandLength { expected, found } => {
                write!(f, "command has {found} entries, expected {expected}")
            }
            Self::InvalidOptions { reason } => write!(f, "invalid engine options: {reason}"),
            Self::Terminated { reason } => write!(f, "engine terminated: {reason}"),
        }
    }
}

impl Error for EngineError {}

/// Errors from telemetry layout construction and recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryError {
    /// The log was requested before any run began.
    NotReady,
    /// Two signals resolve to the same dotted key.
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// A key segment is empty or contains a reserved character.
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A sample frame carries a different number of sources than the layout.
    SourceCount {
        /// Sources in the layout.
        expected: usize,
        /// Sources in the frame.
        found: usize,
    },
    /// A source produced fewer samples than it declared signals.
    MissingSamples {
        /// The source's name.
        source_name: String,
        /// Declared signal count.
        expected: usize,
        /// Samples produced.
        found: usize,
    },
    /// A source produced more samples than it declared signals.
    ExtraSamples {
        /// The source's name.
        source_name: String,
        /// Declared signal count.
        expected: usize,
        /// Samples produced.
        found: usize,
    },
    /// A record arrived for a step other than the next one.
    OutOfOrder {
        /// The step the recorder expected.
        expected: StepId,
        /// The step supplied.
        found: StepId,
    },
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "no telemetry run has begun"),
            Self::DuplicateKey { key } => write!(f, "duplicate log key '{key}'"),
            Self::InvalidKey { key, reason } => write!(f, "invalid log key '{key}': {reason}"),
            Self::SourceCount { expected, found } => {
                write!(f, "sample frame has {found} sources, layout has {expected}")
            }
            Self::MissingSamples {
                source_name,
                expected,
                found,
            } => write!(
                f,
                "source '{source_name}' produced {found} samples for {expected} signals"
            ),
            Self::ExtraSamples {
                source_name,
                expected,
                found,
            } => write!(
                f,
                "source '{source_name}' produced {found} samples, only {expected} declared"
            ),
            Self::OutOfOrder { expected, found } => {
                write!(f, "record for step {found}, expected step {expected}")
            }
        }
    }
}

impl Error for TelemetryError {}

/// Errors from frame capture and comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// No visual backend is attached.
    Unavailable,
    /// The requested mode string is not recognized.
    UnsupportedMode {
        /// The rejected mode.
        mode: String,
    },
    /// Two frames of different shape were compared.
    ShapeMismatch {
        /// `(width, height)` of the left frame.
        expected: (u32, u32),
        /// `(width, height)` of the right frame.
        found: (u32, u32),
    },
    /// A pixel buffer does not hold `width * height * 3` bytes.
    BufferSize {
        /// Required byte count.
        expected: usize,
        /// Supplied byte count.
        found: usize,
    },
    /// The camera configuration is unusable.
    InvalidCamera {
        /// Description of the problem.
        reason: String,
    },
    /// The drawing backend failed while producing a frame.
    Backend {
        /// Backend error message.
        reason: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "no render backend attached"),
            Self::UnsupportedMode { mode } => write!(f, "unsupported render mode '{mode}'"),
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "frame shape {}x{} does not match {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::BufferSize { expected, found } => {
                write!(f, "pixel buffer has {found} bytes, expected {expected}")
            }
            Self::InvalidCamera { reason } => write!(f, "invalid camera: {reason}"),
            Self::Backend { reason } => write!(f, "render backend failed: {reason}"),
        }
    }
}

impl Error for RenderError {}
