use crate::composite::image::FlatImage;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SpriteError, SpriteResult};
use crate::tile::scratch::{TileScratch, TileView};

/// Canvas and tile dimensions accompanying a sliced image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Edge length of every tile.
    pub tile_size: u32,
}

impl Manifest {
    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        self.width.div_ceil(self.tile_size.max(1))
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.height.div_ceil(self.tile_size.max(1))
    }

    /// Total tiles emitted for this canvas.
    pub fn tile_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }
}

/// A `size x size` RGBA8 square cut from a flat image.
///
/// Pixels outside the source canvas are transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Left edge in canvas pixels.
    pub origin_x: u32,
    /// Top edge in canvas pixels.
    pub origin_y: u32,
    /// Edge length.
    pub size: u32,
    /// `size*size*4` bytes, row-major.
    pub pixels: Vec<u8>,
}

impl Tile {
    /// `tile_<y>_<x>.bin`
    pub fn file_name(&self) -> String {
        tile_file_name(self.origin_x, self.origin_y)
    }

    /// Pixel at tile-local `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = (y as usize * self.size as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

pub(crate) fn tile_file_name(origin_x: u32, origin_y: u32) -> String {
    format!("tile_{origin_y}_{origin_x}.bin")
}

/// Slice an image into row-major `tile_size` squares.
///
/// The image is consumed; the returned tiles own copies of its pixels.
#[tracing::instrument(skip(image), fields(width = image.width, height = image.height))]
pub fn slice_image(image: FlatImage, tile_size: u32) -> SpriteResult<(Vec<Tile>, Manifest)> {
    let mut tiles = Vec::new();
    let manifest = for_each_tile(&image, tile_size, |view| {
        tiles.push(view.to_tile());
        Ok(())
    })?;
    tracing::debug!(tiles = tiles.len(), "sliced image");
    Ok((tiles, manifest))
}

/// Visit every tile in row-major grid order through one reused scratch buffer.
///
/// Each [`TileView`] borrows the scratch and is invalid once `f` returns.
pub fn for_each_tile<F>(image: &FlatImage, tile_size: u32, mut f: F) -> SpriteResult<Manifest>
where
    F: FnMut(TileView<'_>) -> SpriteResult<()>,
{
    image.validate()?;
    let mut scratch = TileScratch::new(tile_size)?;
    for (origin_x, origin_y) in grid_origins(image.width, image.height, tile_size)? {
        f(scratch.fill(image, origin_x, origin_y))?;
    }
    Ok(Manifest {
        width: image.width,
        height: image.height,
        tile_size,
    })
}

/// Tile origins `(x, y)` in row-major order.
pub(crate) fn grid_origins(
    width: u32,
    height: u32,
    tile_size: u32,
) -> SpriteResult<impl Iterator<Item = (u32, u32)>> {
    if tile_size == 0 {
        return Err(SpriteError::validation("tile size must be > 0"));
    }
    let step = tile_size as usize;
    Ok((0..height)
        .step_by(step)
        .flat_map(move |y| (0..width).step_by(step).map(move |x| (x, y))))
}

#[cfg(test)]
#[path = "../../tests/unit/tile/slicer.rs"]
mod tests;
