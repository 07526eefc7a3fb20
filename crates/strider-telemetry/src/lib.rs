//! Structured telemetry for Strider runs.
//!
//! A run's log is a table: one column per enabled signal, one row per
//! completed step. The column set is fixed at reset by a [`LogLayout`]
//! built from the telemetry options and the declared signals of every
//! source, and never changes mid-run.
//!
//! # Architecture
//!
//! - [`LogLayout`] filters, orders, and interns signal keys per source
//! - [`SampleFrame`] carries one step's raw values, one vector per source
//! - [`Recorder`] validates each frame against the layout and appends it
//! - [`LogRecord`] is the finalized, queryable table
//! - [`log_hash`] and [`compare_logs`] check runs for bit-identity

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod hash;
pub mod layout;
pub mod record;
pub mod recorder;

pub use compare::{compare_logs, DivergenceKind, LogDivergence, LogDivergenceReport};
pub use hash::log_hash;
pub use layout::{LogLayout, LogLayoutBuilder};
pub use record::LogRecord;
pub use recorder::{Recorder, SampleFrame};
