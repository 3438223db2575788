//! spritetile turns layered sprite documents into flat images and tile sets.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: `bytes -> Document` (canvas extent, layers, frames of positioned cels)
//! 2. **Composite**: `Frame -> FlatImage` (cels painted back to front by layer index)
//! 3. **Slice**: `FlatImage -> Vec<Tile> + Manifest` (row-major, transparent padding)
//!
//! Data flows one way and every stage owns its output. Only the first frame
//! of a document is composited. Compositing replaces destination pixels
//! wherever the source alpha is non-zero; there is no alpha blending.
//!
//! File and directory handling lives in the `spritetile` binary, not here.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod document;
mod foundation;
mod pipeline;
mod tile;

pub use composite::image::{FlatImage, FlatImageRecord, FramePixels};
pub use composite::layers::{composite_document, composite_frame};
pub use document::decode::decode_document;
pub use document::encode::encode_document;
pub use document::model::{Cel, Document, Frame, Layer};
pub use foundation::core::{Canvas, Rgba8, TRANSPARENT};
pub use foundation::error::{SpriteError, SpriteResult};
pub use pipeline::{DEFAULT_TILE_SIZE, PipelineOpts, flatten, run};
pub use tile::assemble::reassemble;
pub use tile::scratch::{TileScratch, TileView};
pub use tile::slicer::{Manifest, Tile, for_each_tile, slice_image};
