// On-disk layout of the sprite container, format version 1.
// All integers are little-endian.

pub(crate) const FILE_MAGIC: u16 = 0xA5E0;
pub(crate) const FRAME_MAGIC: u16 = 0xF1FA;

pub(crate) const HEADER_LEN: usize = 128;
pub(crate) const FRAME_HEADER_LEN: usize = 16;
pub(crate) const CHUNK_HEADER_LEN: usize = 6;

/// Bits per pixel; only RGBA8 is understood.
pub(crate) const COLOR_DEPTH_RGBA: u16 = 32;

pub(crate) const CHUNK_LAYER: u16 = 0x2004;
pub(crate) const CHUNK_CEL: u16 = 0x2005;

pub(crate) const CEL_RAW: u16 = 0;
pub(crate) const CEL_LINKED: u16 = 1;
pub(crate) const CEL_COMPRESSED: u16 = 2;
pub(crate) const CEL_TILEMAP: u16 = 3;

// Frame headers carry a 16-bit chunk count that saturates here; the 32-bit
// count that follows is authoritative when non-zero.
pub(crate) const OLD_CHUNK_COUNT_MAX: u16 = 0xFFFF;

pub(crate) const LAYER_FLAG_VISIBLE: u16 = 1;
