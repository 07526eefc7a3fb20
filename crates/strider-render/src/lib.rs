//! Software rendering of planar robots.
//!
//! [`CanvasRenderer`] implements [`Renderer`](strider_core::Renderer) by
//! drawing the robot's links and joints with `plotters` into an in-memory
//! RGB bitmap. Output depends only on the camera, the model, and the joint
//! positions, so frames from two runs with identical state are
//! byte-identical.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod camera;
pub mod kinematics;
pub mod renderer;

pub use camera::{CameraConfig, Palette};
pub use kinematics::{forward_kinematics, LinkPose};
pub use renderer::CanvasRenderer;
