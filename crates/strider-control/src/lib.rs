//! Controllers for Strider pipelines.
//!
//! [`PdController`] turns an [`Action`](strider_core::Action) of target
//! joint positions into motor torques using the latest encoder readings.
//! It also owns the naming of its telemetry signals, so callers can find
//! a motor's target-velocity column in the log without string guessing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pd;

pub use config::{PdConfig, PdGains};
pub use error::ControllerError;
pub use pd::{ChannelSignals, ControlOutput, PdController};
