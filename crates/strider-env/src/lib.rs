//! Reset/step orchestration for Strider control pipelines.
//!
//! [`Environment`] wires an [`Engine`](strider_core::Engine), an optional
//! [`Renderer`](strider_core::Renderer), a PD controller, sensor adapters,
//! and a telemetry recorder into a single deterministic lifecycle. Every
//! successful step appends exactly one value to every enabled log column.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod sensor;

pub use config::{ConfigError, EnvConfig};
pub use environment::Environment;
pub use error::{EnvError, EnvState};
pub use metrics::StepMetrics;
pub use sensor::{EffortAdapter, EncoderAdapter, SensorAdapter};
