use crate::composite::image::FlatImage;
use crate::composite::layers::composite_document;
use crate::document::decode::decode_document;
use crate::foundation::error::{SpriteError, SpriteResult};
use crate::tile::slicer::{Manifest, Tile, slice_image};

/// Tile edge used when the caller does not pick one.
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Caller-supplied pipeline configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineOpts {
    /// Edge length of emitted tiles (`> 0`).
    pub tile_size: u32,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl PipelineOpts {
    /// Reject configurations that slicing cannot honor.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.tile_size == 0 {
            return Err(SpriteError::validation("tile size must be > 0"));
        }
        Ok(())
    }
}

/// Decode a document and composite its first frame.
pub fn flatten(bytes: &[u8]) -> SpriteResult<FlatImage> {
    let doc = decode_document(bytes)?;
    composite_document(&doc)
}

/// Decode, composite and slice in one call.
///
/// Options are validated before any decoding happens.
pub fn run(bytes: &[u8], opts: &PipelineOpts) -> SpriteResult<(Vec<Tile>, Manifest)> {
    opts.validate()?;
    let image = flatten(bytes)?;
    slice_image(image, opts.tile_size)
}
