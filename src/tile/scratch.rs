use crate::composite::image::FlatImage;
use crate::foundation::error::{SpriteError, SpriteResult};
use crate::tile::slicer::{Tile, tile_file_name};

/// Caller-owned `tile_size x tile_size` RGBA8 buffer reused across tiles.
///
/// Every [`TileScratch::fill`] zeroes the whole buffer before copying, so no
/// pixels from a previous tile survive into the padding of the next one.
#[derive(Debug)]
pub struct TileScratch {
    size: u32,
    buf: Vec<u8>,
}

impl TileScratch {
    /// Allocate scratch for `tile_size` squares.
    pub fn new(tile_size: u32) -> SpriteResult<Self> {
        if tile_size == 0 {
            return Err(SpriteError::validation("tile size must be > 0"));
        }
        let len = (tile_size as usize)
            .checked_mul(tile_size as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| SpriteError::validation(format!("tile size {tile_size} is too large")))?;
        Ok(Self {
            size: tile_size,
            buf: vec![0; len],
        })
    }

    /// Edge length of the tiles this scratch holds.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Copy the tile at `(origin_x, origin_y)` into the scratch.
    ///
    /// Only the overlap with `[0, width) x [0, height)` is read from `image`;
    /// the remainder stays transparent. Rows missing from a short buffer are
    /// left as padding.
    pub fn fill(&mut self, image: &FlatImage, origin_x: u32, origin_y: u32) -> TileView<'_> {
        self.buf.fill(0);

        if origin_x < image.width && origin_y < image.height {
            let cols = (image.width - origin_x).min(self.size) as usize;
            let rows = (image.height - origin_y).min(self.size) as usize;
            let src_stride = image.width as usize * 4;
            let dst_stride = self.size as usize * 4;
            let run = cols * 4;

            for row in 0..rows {
                let src = (origin_y as usize + row) * src_stride + origin_x as usize * 4;
                let Some(src) = image.pixels.get(src..src + run) else {
                    break;
                };
                let dst = row * dst_stride;
                self.buf[dst..dst + run].copy_from_slice(src);
            }
        }

        TileView {
            origin_x,
            origin_y,
            size: self.size,
            pixels: &self.buf,
        }
    }
}

/// Borrowed tile contents living in a [`TileScratch`].
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    /// Left edge in canvas pixels.
    pub origin_x: u32,
    /// Top edge in canvas pixels.
    pub origin_y: u32,
    /// Edge length.
    pub size: u32,
    /// `size*size*4` bytes, row-major.
    pub pixels: &'a [u8],
}

impl TileView<'_> {
    /// `tile_<y>_<x>.bin`
    pub fn file_name(&self) -> String {
        tile_file_name(self.origin_x, self.origin_y)
    }

    /// Copy out into an owned [`Tile`].
    pub fn to_tile(&self) -> Tile {
        Tile {
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            size: self.size,
            pixels: self.pixels.to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tile/scratch.rs"]
mod tests;
