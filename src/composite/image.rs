use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Composited RGBA8 pixels for one frame, row-major, straight alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width*height*4` bytes.
    pub pixels: Vec<u8>,
}

impl FlatImage {
    /// Fully transparent image of the given extent.
    pub fn new(width: u32, height: u32) -> Self {
        let len = Canvas { width, height }.byte_len();
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    /// Extent of the image.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image, returning its RGBA8 bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Check that the buffer length matches the declared extent.
    pub fn validate(&self) -> SpriteResult<()> {
        let expected = self.canvas().byte_len();
        if self.pixels.len() != expected {
            return Err(SpriteError::validation(format!(
                "image buffer is {} bytes, expected {expected} for {}x{}",
                self.pixels.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Copy into an [`image::RgbaImage`] for encoding to PNG and friends.
    pub fn to_rgba_image(&self) -> SpriteResult<image::RgbaImage> {
        self.validate()?;
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .context("wrap flat image as RgbaImage")?;
        Ok(img)
    }

    /// Serializable view matching the flat-JSON export layout.
    pub fn to_record(&self) -> FlatImageRecord<'_> {
        FlatImageRecord {
            width: self.width,
            height: self.height,
            frames: [FramePixels {
                pixels: &self.pixels,
            }],
        }
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// `{ "width", "height", "frames": [ { "pixels": [...] } ] }`
#[derive(Debug, serde::Serialize)]
pub struct FlatImageRecord<'a> {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Always exactly one entry: the composited first frame.
    pub frames: [FramePixels<'a>; 1],
}

/// Pixel array of one exported frame.
#[derive(Debug, serde::Serialize)]
pub struct FramePixels<'a> {
    /// RGBA8 bytes, serialized as a flat number array.
    pub pixels: &'a [u8],
}

#[cfg(test)]
#[path = "../../tests/unit/composite/image.rs"]
mod tests;
