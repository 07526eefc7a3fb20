//! Reference physics collaborator for Strider.
//!
//! [`JointSpaceEngine`] integrates decoupled per-joint dynamics with a
//! fixed timestep and implements [`Engine`](strider_core::Engine).
//! [`biped()`] builds the planar biped used by the end-to-end tests and
//! benchmarks.
//!
//! This is not a general physics engine: there are no contacts and no
//! coupling between joints. It is deterministic and bit-reproducible,
//! which is what the pipeline above it needs to be validated.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod biped;
pub mod engine;

pub use biped::biped;
pub use engine::JointSpaceEngine;
