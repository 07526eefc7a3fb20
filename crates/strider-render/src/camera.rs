//! Camera and colour configuration.

use strider_core::RenderError;

/// Fill colours, as RGB bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Sky.
    pub background: [u8; 3],
    /// Everything below the ground line.
    pub ground: [u8; 3],
    /// Link segments.
    pub link: [u8; 3],
    /// Joint discs.
    pub joint: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [232, 238, 244],
            ground: [96, 112, 88],
            link: [52, 84, 140],
            joint: [214, 120, 44],
        }
    }
}

/// A fixed orthographic side view.
///
/// World coordinates are metres with `y` up; the ground is `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Scale in pixels per metre.
    pub pixels_per_meter: f64,
    /// World point drawn at the image centre.
    pub center: [f64; 2],
    /// World position of the robot's root joints.
    pub base: [f64; 2],
    /// Link thickness in pixels.
    pub link_width: f64,
    /// Joint disc radius in pixels.
    pub joint_radius: f64,
    /// Colours.
    pub palette: Palette,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            pixels_per_meter: 140.0,
            center: [0.0, 0.72],
            base: [0.0, 0.92],
            link_width: 6.0,
            joint_radius: 4.5,
            palette: Palette::default(),
        }
    }
}

impl CameraConfig {
    /// Check dimensions and scale.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |reason: String| Err(RenderError::InvalidCamera { reason });
        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "image must be non-empty, got {}x{}",
                self.width, self.height
            ));
        }
        if !(self.pixels_per_meter.is_finite() && self.pixels_per_meter > 0.0) {
            return invalid(format!(
                "pixels_per_meter must be finite and > 0, got {}",
                self.pixels_per_meter
            ));
        }
        if !(self.link_width.is_finite() && self.link_width > 0.0) {
            return invalid(format!(
                "link_width must be finite and > 0, got {}",
                self.link_width
            ));
        }
        if !(self.joint_radius.is_finite() && self.joint_radius >= 0.0) {
            return invalid(format!(
                "joint_radius must be finite and >= 0, got {}",
                self.joint_radius
            ));
        }
        if !self.center.iter().chain(&self.base).all(|v| v.is_finite()) {
            return invalid("center and base must be finite".to_string());
        }
        Ok(())
    }

    /// Map a world point to continuous pixel coordinates (x right, y down).
    pub fn to_pixel(&self, world: [f64; 2]) -> [f64; 2] {
        let s = self.pixels_per_meter;
        [
            (world[0] - self.center[0]) * s + f64::from(self.width) / 2.0,
            f64::from(self.height) / 2.0 - (world[1] - self.center[1]) * s,
        ]
    }

    /// Map a world point to the nearest backend pixel.
    ///
    /// Points far outside the image saturate rather than wrap.
    pub fn to_backend(&self, world: [f64; 2]) -> (i32, i32) {
        let [x, y] = self.to_pixel(world);
        (x.floor() as i32, y.floor() as i32)
    }
}
