use crate::foundation::error::{GnxError, GnxResult};

pub use kurbo::Point;

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Validate that both dimensions are non-zero and fit the CPU rasterizer (`u16`).
    pub fn new(width: u32, height: u32) -> GnxResult<Self> {
        if width == 0 || height == 0 {
            return Err(GnxError::validation("canvas dimensions must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(GnxError::validation(format!(
                "canvas {width}x{height} exceeds {max}x{max}",
                max = u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    pub(crate) fn width_u16(self) -> u16 {
        self.width as u16
    }

    pub(crate) fn height_u16(self) -> u16 {
        self.height as u16
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
