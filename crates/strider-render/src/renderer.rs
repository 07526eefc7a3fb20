//! The [`Renderer`] implementation.

use plotters::prelude::*;
use strider_core::{RenderError, RenderFrame, RenderMode, Renderer, SceneView};

use crate::camera::CameraConfig;
use crate::kinematics::forward_kinematics;

/// Draws the ground, then every link as a thick path, then every joint
/// as a filled circle, all in model order, onto an in-memory bitmap.
#[derive(Clone, Debug)]
pub struct CanvasRenderer {
    camera: CameraConfig,
}

// Compile-time assertion: renderers move with their environment.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<CanvasRenderer>();
    }
};

impl CanvasRenderer {
    /// Create a renderer for a validated camera.
    pub fn new(camera: CameraConfig) -> Result<Self, RenderError> {
        camera.validate()?;
        Ok(Self { camera })
    }

    /// The camera in use.
    pub fn camera(&self) -> &CameraConfig {
        &self.camera
    }

    fn draw(&self, scene: &SceneView<'_>, buffer: &mut [u8]) -> Result<(), RenderError> {
        let cam = &self.camera;
        let palette = cam.palette;
        let (width, height) = (cam.width as i32, cam.height as i32);
        let root = BitMapBackend::with_buffer(buffer, (cam.width, cam.height)).into_drawing_area();
        root.fill(&rgb(palette.background)).map_err(backend)?;

        let (_, ground) = cam.to_backend([0.0, 0.0]);
        if ground < height {
            root.draw(&Rectangle::new(
                [(0, ground.max(0)), (width, height)],
                rgb(palette.ground).filled(),
            ))
            .map_err(backend)?;
        }

        let poses = forward_kinematics(scene.model, &scene.state.positions, cam.base);
        let link_style = rgb(palette.link).stroke_width(cam.link_width.round().max(1.0) as u32);
        for pose in &poses {
            root.draw(&PathElement::new(
                vec![cam.to_backend(pose.start), cam.to_backend(pose.end)],
                link_style,
            ))
            .map_err(backend)?;
        }
        if cam.joint_radius > 0.0 {
            let joint_style = rgb(palette.joint).filled();
            for pose in &poses {
                root.draw(&Circle::new(
                    cam.to_backend(pose.start),
                    cam.joint_radius,
                    joint_style,
                ))
                .map_err(backend)?;
            }
        }
        root.present().map_err(backend)
    }
}

impl Renderer for CanvasRenderer {
    fn capture(&self, scene: &SceneView<'_>, mode: RenderMode) -> Result<RenderFrame, RenderError> {
        match mode {
            RenderMode::RgbArray => {}
        }
        let (width, height) = self.frame_shape();
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        self.draw(scene, &mut pixels)?;
        RenderFrame::new(width, height, pixels)
    }

    fn frame_shape(&self) -> (u32, u32) {
        (self.camera.width, self.camera.height)
    }
}

fn rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

fn backend(e: impl std::fmt::Display) -> RenderError {
    RenderError::Backend {
        reason: e.to_string(),
    }
}
