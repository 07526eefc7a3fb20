//! Core types and traits for the Strider control pipeline.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! data contracts shared by every other crate in the workspace: channel and
//! step identifiers, the [`FieldRegistry`], the robot model and engine
//! options tree, observations and actions, telemetry signal descriptors,
//! render frames, the collaborator traits ([`Engine`], [`Renderer`],
//! [`TelemetrySource`]), and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod frame;
pub mod hash;
pub mod id;
pub mod model;
pub mod observation;
pub mod options;
pub mod registry;
pub mod telemetry;
pub mod traits;

pub use error::{
    ActionError, EngineError, ModelError, RegistryError, RenderError, TelemetryError,
};
pub use frame::{RenderFrame, RenderMode};
pub use hash::Fnv1a;
pub use id::{ChannelId, SignalId, StepId};
pub use model::{EffortSensorSpec, EncoderSpec, JointSpec, MotorSpec, RobotModel};
pub use observation::{Action, Observation, SensorData, SensorKind, SensorLayout};
pub use options::{EngineOptions, InitialStateOptions, StepperOptions, TelemetryOptions};
pub use registry::{ChannelDef, ChannelGroup, FieldRegistry, FieldRegistryBuilder};
pub use telemetry::{LogKey, SignalClass, SignalSpec, TelemetrySource};
pub use traits::{Engine, JointState, Renderer, SceneView};
