use crate::foundation::error::{SpriteError, SpriteResult};

/// Straight (non-premultiplied) RGBA8 quadruplet.
pub type Rgba8 = [u8; 4];

/// Fully transparent black, the value every canvas and tile starts from.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Canvas extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting zero-sized extents.
    pub fn new(width: u32, height: u32) -> SpriteResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Byte length of an RGBA8 buffer covering the canvas.
    pub fn byte_len(self) -> usize {
        self.pixel_count().saturating_mul(4)
    }

    /// Whether a signed coordinate falls inside `[0, width) x [0, height)`.
    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
