//! Strider: a deterministic simulation harness for legged-robot control.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Strider sub-crates. For most users, adding `strider` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strider::prelude::*;
//!
//! let engine = JointSpaceEngine::new(biped()).unwrap();
//! let renderer = CanvasRenderer::new(CameraConfig::default()).unwrap();
//! let mut env = Environment::new(EnvConfig::new(engine).with_renderer(renderer)).unwrap();
//!
//! // Record joint velocities for this run and hold the initial pose.
//! let observation = env
//!     .reset_with(|options| options.telemetry.enable_velocity = true)
//!     .unwrap();
//! let hold = env.controller().hold_action(&observation).unwrap();
//! for _ in 0..100 {
//!     env.step(&hold).unwrap();
//! }
//!
//! let log = env.get_log().unwrap();
//! assert_eq!(log.steps, 100);
//! assert!(log.contains_key("Global.stepper.Time"));
//!
//! let frame = env.render(RenderMode::RgbArray).unwrap();
//! assert_eq!(frame.shape(), (320, 240));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strider-core` | Registry, model, observations, options, collaborator traits |
//! | [`sim`] | `strider-sim` | Reference joint-space engine and the biped model |
//! | [`control`] | `strider-control` | PD controller and gain configuration |
//! | [`telemetry`] | `strider-telemetry` | Log layout, recorder, hashing, comparison |
//! | [`render`] | `strider-render` | Bitmap renderer built on `plotters` |
//! | [`env`] | `strider-env` | The reset/step environment |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`strider-core`).
///
/// Contains the [`types::FieldRegistry`], the [`types::RobotModel`], the
/// options tree, observation tables, and the collaborator traits
/// ([`types::Engine`], [`types::Renderer`], [`types::TelemetrySource`]).
pub use strider_core as types;

/// Reference physics (`strider-sim`).
pub use strider_sim as sim;

/// PD control (`strider-control`).
///
/// [`control::PdController`] turns position targets into motor commands.
pub use strider_control as control;

/// Structured telemetry (`strider-telemetry`).
///
/// Record runs with [`telemetry::Recorder`], fingerprint them with
/// [`telemetry::log_hash`], and diff them with [`telemetry::compare_logs`].
pub use strider_telemetry as telemetry;

/// Software rendering (`strider-render`).
pub use strider_render as render;

/// The environment orchestrator (`strider-env`).
pub use strider_env as env;

/// Common imports for typical Strider usage.
///
/// ```rust
/// use strider::prelude::*;
/// ```
///
/// This imports the environment and its configuration, the reference
/// engine and renderer, the controller, observation and action types, and
/// the error types.
pub mod prelude {
    // Core types and traits
    pub use strider_core::{
        Action, ChannelGroup, Engine, EngineOptions, FieldRegistry, Observation, RenderFrame,
        RenderMode, Renderer, RobotModel, SensorData, SensorKind, StepId, TelemetryOptions,
    };

    // Errors
    pub use strider_core::{ActionError, EngineError, RenderError, TelemetryError};

    // Reference collaborators
    pub use strider_render::{CameraConfig, CanvasRenderer};
    pub use strider_sim::{biped, JointSpaceEngine};

    // Control
    pub use strider_control::{PdConfig, PdController, PdGains};

    // Telemetry
    pub use strider_telemetry::{compare_logs, log_hash, LogRecord};

    // Environment
    pub use strider_env::{
        ConfigError, EnvConfig, EnvError, EnvState, Environment, StepMetrics,
    };
}
