use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Decoded sprite document: canvas extent, layer table and frames.
///
/// Produced by [`crate::decode_document`] and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Canvas width in pixels (`> 0`).
    pub width: u32,
    /// Canvas height in pixels (`> 0`).
    pub height: u32,
    /// Layer table in declaration order; a cel's `layer_index` indexes into it.
    pub layers: Vec<Layer>,
    /// Frames in file order. Only the first one is ever composited.
    pub frames: Vec<Frame>,
}

impl Document {
    /// Canvas extent of the document.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// The frame the pipeline composites.
    pub fn first_frame(&self) -> SpriteResult<&Frame> {
        self.frames.first().ok_or(SpriteError::NoFrames)
    }
}

/// Descriptive layer record.
///
/// Visibility, opacity and blend mode are carried for callers that want to
/// inspect them; compositing does not apply them.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Layer {
    /// Display name.
    pub name: String,
    /// Raw layer flag bits.
    pub flags: u16,
    /// Raw layer type (0 = image, 1 = group, 2 = tilemap).
    pub layer_type: u16,
    /// Nesting depth inside layer groups.
    pub child_level: u16,
    /// Raw blend mode identifier.
    pub blend_mode: u16,
    /// Layer opacity, 0..=255.
    pub opacity: u8,
}

impl Layer {
    /// Whether the visible flag is set.
    pub fn visible(&self) -> bool {
        self.flags & crate::document::layout::LAYER_FLAG_VISIBLE != 0
    }
}

/// One still image made of possibly-overlapping cels.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Frame {
    /// Display duration in milliseconds.
    pub duration_ms: u16,
    /// Cels in encounter order; paint order is imposed by `layer_index`.
    pub cels: Vec<Cel>,
}

/// A layer's positioned pixel payload within one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cel {
    /// Paint order key (ascending = back to front).
    pub layer_index: u32,
    /// Left edge on the canvas; may be negative.
    pub x: i32,
    /// Top edge on the canvas; may be negative.
    pub y: i32,
    /// Extent width in pixels.
    pub w: u32,
    /// Extent height in pixels.
    pub h: u32,
    /// `w*h` RGBA8 quadruplets, row-major. `None` marks an empty cel.
    pub pixels: Option<Vec<u8>>,
}

impl Cel {
    /// Build a cel with a pixel payload, checking that it covers `w*h` pixels.
    pub fn with_pixels(
        layer_index: u32,
        (x, y): (i32, i32),
        (w, h): (u32, u32),
        pixels: Vec<u8>,
    ) -> SpriteResult<Self> {
        let expected = payload_len(w, h);
        if pixels.len() != expected {
            return Err(SpriteError::validation(format!(
                "cel payload is {} bytes, expected {expected} for {w}x{h}",
                pixels.len()
            )));
        }
        Ok(Self {
            layer_index,
            x,
            y,
            w,
            h,
            pixels: Some(pixels),
        })
    }

    /// Build a cel with no payload.
    pub fn empty(layer_index: u32, (x, y): (i32, i32), (w, h): (u32, u32)) -> Self {
        Self {
            layer_index,
            x,
            y,
            w,
            h,
            pixels: None,
        }
    }

    /// Whether the cel carries no pixel payload.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_none()
    }

    /// Pixel at local coordinate `(px, py)`, if in range and present.
    pub fn pixel(&self, px: u32, py: u32) -> Option<Rgba8> {
        if px >= self.w || py >= self.h {
            return None;
        }
        let i = (py as usize * self.w as usize + px as usize) * 4;
        let src = self.pixels.as_deref()?.get(i..i + 4)?;
        Some([src[0], src[1], src[2], src[3]])
    }
}

pub(crate) fn payload_len(w: u32, h: u32) -> usize {
    (w as usize).saturating_mul(h as usize).saturating_mul(4)
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
