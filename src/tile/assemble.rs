use crate::composite::image::FlatImage;
use crate::foundation::error::{SpriteError, SpriteResult};
use crate::tile::slicer::{Manifest, Tile};

/// Paste tiles back at their origins and crop to the manifest's canvas.
///
/// The tile set must be exactly the grid [`crate::slice_image`] emits for
/// `manifest`: one correctly sized tile per grid cell, any order.
pub fn reassemble(tiles: &[Tile], manifest: &Manifest) -> SpriteResult<FlatImage> {
    let ts = manifest.tile_size;
    if ts == 0 {
        return Err(SpriteError::validation("manifest tile size must be > 0"));
    }
    if tiles.len() != manifest.tile_count() {
        return Err(SpriteError::validation(format!(
            "expected {} tiles for {}x{} at {ts}, got {}",
            manifest.tile_count(),
            manifest.width,
            manifest.height,
            tiles.len()
        )));
    }

    let mut image = FlatImage::new(manifest.width, manifest.height);
    let mut seen = vec![false; tiles.len()];
    let tile_len = (ts as usize)
        .checked_mul(ts as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| SpriteError::validation(format!("tile size {ts} is too large")))?;

    for tile in tiles {
        if tile.size != ts || tile.pixels.len() != tile_len {
            return Err(SpriteError::validation(format!(
                "{} has size {} and {} bytes, expected {ts} and {tile_len}",
                tile.file_name(),
                tile.size,
                tile.pixels.len()
            )));
        }
        if tile.origin_x % ts != 0
            || tile.origin_y % ts != 0
            || tile.origin_x >= manifest.width
            || tile.origin_y >= manifest.height
        {
            return Err(SpriteError::validation(format!(
                "{} is not on the tile grid",
                tile.file_name()
            )));
        }
        let cell = (tile.origin_y / ts) as usize * manifest.columns() as usize
            + (tile.origin_x / ts) as usize;
        if std::mem::replace(&mut seen[cell], true) {
            return Err(SpriteError::validation(format!(
                "{} appears more than once",
                tile.file_name()
            )));
        }

        let cols = (manifest.width - tile.origin_x).min(ts) as usize;
        let rows = (manifest.height - tile.origin_y).min(ts) as usize;
        let run = cols * 4;
        for row in 0..rows {
            let src = row * ts as usize * 4;
            let dst = image.index(tile.origin_x, tile.origin_y + row as u32);
            image.pixels[dst..dst + run].copy_from_slice(&tile.pixels[src..src + run]);
        }
    }
    Ok(image)
}

#[cfg(test)]
#[path = "../../tests/unit/tile/assemble.rs"]
mod tests;
