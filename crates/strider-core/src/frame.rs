//! Rendered frames and render modes.

use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;
use crate::hash::Fnv1a;

/// Requested output of a render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// An RGB pixel array, 8 bits per channel.
    RgbArray,
}

impl RenderMode {
    /// Canonical mode string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RgbArray => "rgb_array",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rgb_array" | "pixel-array" => Ok(Self::RgbArray),
            other => Err(RenderError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// An RGB image: `height` rows of `width` pixels, 3 bytes each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RenderFrame {
    /// Wrap a pixel buffer, checking its size.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes, row-major from the top-left pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Mean absolute per-byte difference against `other`.
    pub fn mean_abs_diff(&self, other: &RenderFrame) -> Result<f64, RenderError> {
        if self.shape() != other.shape() {
            return Err(RenderError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        if self.pixels.is_empty() {
            return Ok(0.0);
        }
        let total: u64 = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| u64::from(a.abs_diff(*b)))
            .sum();
        Ok(total as f64 / self.pixels.len() as f64)
    }

    /// FNV-1a over shape and pixels.
    pub fn content_hash(&self) -> u64 {
        let mut h = Fnv1a::new();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.pixels);
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_both_spellings() {
        assert_eq!("rgb_array".parse::<RenderMode>(), Ok(RenderMode::RgbArray));
        assert_eq!("pixel-array".parse::<RenderMode>(), Ok(RenderMode::RgbArray));
        assert!(matches!(
            "human".parse::<RenderMode>(),
            Err(RenderError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn buffer_size_checked() {
        assert!(RenderFrame::new(2, 2, vec![0; 12]).is_ok());
        assert_eq!(
            RenderFrame::new(2, 2, vec![0; 11]),
            Err(RenderError::BufferSize {
                expected: 12,
                found: 11
            })
        );
    }

    #[test]
    fn mean_abs_diff_averages_bytes() {
        let a = RenderFrame::new(1, 2, vec![0, 0, 0, 10, 10, 10]).unwrap();
        let b = RenderFrame::new(1, 2, vec![0, 0, 6, 10, 10, 10]).unwrap();
        assert_eq!(a.mean_abs_diff(&b), Ok(1.0));
        assert_eq!(a.mean_abs_diff(&a), Ok(0.0));
        assert_ne!(a.content_hash(), b.content_hash());
        assert_eq!(a.pixel(0, 1), Some([10, 10, 10]));
        assert_eq!(a.pixel(1, 0), None);
    }

    #[test]
    fn shape_mismatch_rejected() {
        let a = RenderFrame::new(1, 2, vec![0; 6]).unwrap();
        let b = RenderFrame::new(2, 1, vec![0; 6]).unwrap();
        assert!(matches!(
            a.mean_abs_diff(&b),
            Err(RenderError::ShapeMismatch { .. })
        ));
    }
}
