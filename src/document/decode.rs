use crate::document::layout::{
    CEL_COMPRESSED, CEL_LINKED, CEL_RAW, CEL_TILEMAP, CHUNK_CEL, CHUNK_HEADER_LEN, CHUNK_LAYER,
    COLOR_DEPTH_RGBA, FILE_MAGIC, FRAME_HEADER_LEN, FRAME_MAGIC, HEADER_LEN,
};
use crate::document::model::{Cel, Document, Frame, Layer, payload_len};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Decode a sprite document held fully in memory.
///
/// Fails with [`SpriteError::Malformed`] when the bytes do not follow the
/// header/frame/chunk layout and with [`SpriteError::NoFrames`] when the
/// header declares zero frames. Unknown chunk types are skipped.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_document(bytes: &[u8]) -> SpriteResult<Document> {
    let mut header = Reader::new(bytes).split(HEADER_LEN, "file header")?;

    let file_size = header.u32("file size")? as usize;
    let magic = header.u16("file magic")?;
    if magic != FILE_MAGIC {
        return Err(SpriteError::malformed(format!(
            "bad file magic {magic:#06x}, expected {FILE_MAGIC:#06x}"
        )));
    }
    if file_size < HEADER_LEN || file_size > bytes.len() {
        return Err(SpriteError::malformed(format!(
            "header declares {file_size} bytes, buffer holds {}",
            bytes.len()
        )));
    }

    let frame_count = header.u16("frame count")?;
    let width = u32::from(header.u16("canvas width")?);
    let height = u32::from(header.u16("canvas height")?);
    let depth = header.u16("color depth")?;
    if depth != COLOR_DEPTH_RGBA {
        return Err(SpriteError::malformed(format!(
            "unsupported color depth {depth}, only {COLOR_DEPTH_RGBA}-bit RGBA is decoded"
        )));
    }
    if width == 0 || height == 0 {
        return Err(SpriteError::malformed(format!(
            "canvas must be non-empty, got {width}x{height}"
        )));
    }
    if frame_count == 0 {
        return Err(SpriteError::NoFrames);
    }

    let mut body = Reader::at(&bytes[..file_size], HEADER_LEN);
    let mut layers = Vec::new();
    let mut frames: Vec<Frame> = Vec::with_capacity(usize::from(frame_count));
    for _ in 0..frame_count {
        let frame = decode_frame(&mut body, &mut layers, &frames)?;
        frames.push(frame);
    }

    tracing::debug!(
        width,
        height,
        frames = frames.len(),
        layers = layers.len(),
        "decoded document"
    );
    Ok(Document {
        width,
        height,
        layers,
        frames,
    })
}

fn decode_frame(
    r: &mut Reader<'_>,
    layers: &mut Vec<Layer>,
    prior: &[Frame],
) -> SpriteResult<Frame> {
    let offset = r.offset();
    let frame_bytes = r.u32("frame size")? as usize;
    if frame_bytes < FRAME_HEADER_LEN {
        return Err(SpriteError::malformed(format!(
            "frame at offset {offset} declares {frame_bytes} bytes, smaller than its header"
        )));
    }
    let magic = r.u16("frame magic")?;
    if magic != FRAME_MAGIC {
        return Err(SpriteError::malformed(format!(
            "bad frame magic {magic:#06x} at offset {offset}"
        )));
    }
    let old_chunks = r.u16("chunk count")?;
    let duration_ms = r.u16("frame duration")?;
    r.skip(2, "frame header")?;
    let new_chunks = r.u32("chunk count")?;
    let chunk_count = if new_chunks != 0 {
        new_chunks as usize
    } else {
        usize::from(old_chunks)
    };

    let mut body = r.split(frame_bytes - FRAME_HEADER_LEN, "frame body")?;
    let mut cels = Vec::new();
    for _ in 0..chunk_count {
        let chunk_offset = body.offset();
        let chunk_size = body.u32("chunk size")? as usize;
        if chunk_size < CHUNK_HEADER_LEN {
            return Err(SpriteError::malformed(format!(
                "chunk at offset {chunk_offset} declares {chunk_size} bytes, smaller than its header"
            )));
        }
        let kind = body.u16("chunk type")?;
        let mut payload = body.split(chunk_size - CHUNK_HEADER_LEN, "chunk payload")?;
        match kind {
            CHUNK_LAYER => layers.push(decode_layer(&mut payload)?),
            CHUNK_CEL => cels.push(decode_cel(&mut payload, prior)?),
            other => tracing::debug!(chunk_type = other, offset = chunk_offset, "skipping chunk"),
        }
    }

    Ok(Frame { duration_ms, cels })
}

fn decode_layer(r: &mut Reader<'_>) -> SpriteResult<Layer> {
    let flags = r.u16("layer flags")?;
    let layer_type = r.u16("layer type")?;
    let child_level = r.u16("layer child level")?;
    // Default width/height, ignored.
    r.skip(4, "layer header")?;
    let blend_mode = r.u16("layer blend mode")?;
    let opacity = r.u8("layer opacity")?;
    r.skip(3, "layer header")?;
    let name_len = usize::from(r.u16("layer name length")?);
    let name = String::from_utf8_lossy(r.take(name_len, "layer name")?).into_owned();
    Ok(Layer {
        name,
        flags,
        layer_type,
        child_level,
        blend_mode,
        opacity,
    })
}

fn decode_cel(r: &mut Reader<'_>, prior: &[Frame]) -> SpriteResult<Cel> {
    let offset = r.offset();
    let layer_index = u32::from(r.u16("cel layer index")?);
    let x = i32::from(r.i16("cel x")?);
    let y = i32::from(r.i16("cel y")?);
    // Per-cel opacity and z-index are not part of the canonical schema.
    r.skip(1, "cel opacity")?;
    let cel_type = r.u16("cel type")?;
    r.skip(2 + 5, "cel header")?;

    match cel_type {
        CEL_RAW => {
            let w = u32::from(r.u16("cel width")?);
            let h = u32::from(r.u16("cel height")?);
            let rest = r.rest();
            if rest.is_empty() {
                return Ok(Cel::empty(layer_index, (x, y), (w, h)));
            }
            let expected = payload_len(w, h);
            if rest.len() != expected {
                return Err(SpriteError::malformed(format!(
                    "cel at offset {offset} carries {} pixel bytes, expected {expected} for {w}x{h}",
                    rest.len()
                )));
            }
            Ok(Cel {
                layer_index,
                x,
                y,
                w,
                h,
                pixels: Some(rest.to_vec()),
            })
        }
        CEL_LINKED => {
            let position = usize::from(r.u16("linked frame position")?);
            prior
                .get(position)
                .and_then(|frame| frame.cels.iter().find(|c| c.layer_index == layer_index))
                .cloned()
                .ok_or_else(|| {
                    SpriteError::malformed(format!(
                        "linked cel at offset {offset} references frame {position} with no cel on layer {layer_index}"
                    ))
                })
        }
        CEL_COMPRESSED | CEL_TILEMAP => Err(SpriteError::malformed(format!(
            "cel type {cel_type} at offset {offset} is not supported, only raw RGBA8 payloads are decoded"
        ))),
        other => Err(SpriteError::malformed(format!(
            "unknown cel type {other} at offset {offset}"
        ))),
    }
}

/// Bounds-checked little-endian cursor. `base` is the absolute offset of
/// `bytes[0]` in the document and only feeds error messages.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            base: 0,
        }
    }

    fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos, base: 0 }
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize, what: &str) -> SpriteResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                SpriteError::malformed(format!(
                    "truncated {what} at offset {}: need {n} bytes, {} left",
                    self.offset(),
                    self.remaining()
                ))
            })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn split(&mut self, n: usize, what: &str) -> SpriteResult<Reader<'a>> {
        let base = self.offset();
        let bytes = self.take(n, what)?;
        Ok(Reader { bytes, pos: 0, base })
    }

    fn rest(&mut self) -> &'a [u8] {
        let out = self.bytes.get(self.pos..).unwrap_or(&[]);
        self.pos = self.bytes.len();
        out
    }

    fn skip(&mut self, n: usize, what: &str) -> SpriteResult<()> {
        self.take(n, what).map(|_| ())
    }

    fn array<const N: usize>(&mut self, what: &str) -> SpriteResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u8(&mut self, what: &str) -> SpriteResult<u8> {
        Ok(self.array::<1>(what)?[0])
    }

    fn u16(&mut self, what: &str) -> SpriteResult<u16> {
        self.array(what).map(u16::from_le_bytes)
    }

    fn i16(&mut self, what: &str) -> SpriteResult<i16> {
        self.array(what).map(i16::from_le_bytes)
    }

    fn u32(&mut self, what: &str) -> SpriteResult<u32> {
        self.array(what).map(u32::from_le_bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/decode.rs"]
mod tests;
