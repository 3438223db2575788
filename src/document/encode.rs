use crate::document::layout::{
    CEL_RAW, CHUNK_CEL, CHUNK_HEADER_LEN, CHUNK_LAYER, COLOR_DEPTH_RGBA, FILE_MAGIC,
    FRAME_HEADER_LEN, FRAME_MAGIC, HEADER_LEN, OLD_CHUNK_COUNT_MAX,
};
use crate::document::model::{Cel, Document, Layer, payload_len};
use crate::foundation::error::{SpriteError, SpriteResult};

/// Serialize a document into the container layout read by
/// [`crate::decode_document`].
///
/// Layer chunks are written into the first frame and every cel is written
/// as a raw payload, so linked cels come back as independent copies.
pub fn encode_document(doc: &Document) -> SpriteResult<Vec<u8>> {
    let width = fit_u16(doc.width, "canvas width")?;
    let height = fit_u16(doc.height, "canvas height")?;
    let frame_count = fit_u16(doc.frames.len(), "frame count")?;

    let mut out = Vec::with_capacity(HEADER_LEN);
    put_u32(&mut out, 0); // patched once the total size is known
    put_u16(&mut out, FILE_MAGIC);
    put_u16(&mut out, frame_count);
    put_u16(&mut out, width);
    put_u16(&mut out, height);
    put_u16(&mut out, COLOR_DEPTH_RGBA);
    put_u32(&mut out, 1); // flags: layer opacity is valid
    put_u16(&mut out, 100); // deprecated speed
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    out.push(0); // transparent palette index
    out.extend_from_slice(&[0; 3]);
    put_u16(&mut out, 0); // palette size
    out.push(1); // pixel width
    out.push(1); // pixel height
    put_u16(&mut out, 0); // grid x
    put_u16(&mut out, 0); // grid y
    put_u16(&mut out, 16); // grid width
    put_u16(&mut out, 16); // grid height
    out.resize(HEADER_LEN, 0);

    for (index, frame) in doc.frames.iter().enumerate() {
        let mut chunks: Vec<(u16, Vec<u8>)> = Vec::new();
        if index == 0 {
            for layer in &doc.layers {
                chunks.push((CHUNK_LAYER, layer_payload(layer)?));
            }
        }
        for cel in &frame.cels {
            chunks.push((CHUNK_CEL, cel_payload(cel)?));
        }

        let body_len: usize = chunks
            .iter()
            .map(|(_, payload)| CHUNK_HEADER_LEN + payload.len())
            .sum();
        let frame_bytes = fit_u32(FRAME_HEADER_LEN + body_len, "frame size")?;
        let chunk_count = fit_u32(chunks.len(), "chunk count")?;

        put_u32(&mut out, frame_bytes);
        put_u16(&mut out, FRAME_MAGIC);
        put_u16(
            &mut out,
            u16::try_from(chunk_count).unwrap_or(OLD_CHUNK_COUNT_MAX),
        );
        put_u16(&mut out, frame.duration_ms);
        out.extend_from_slice(&[0; 2]);
        put_u32(&mut out, chunk_count);

        for (kind, payload) in chunks {
            put_u32(&mut out, fit_u32(CHUNK_HEADER_LEN + payload.len(), "chunk size")?);
            put_u16(&mut out, kind);
            out.extend_from_slice(&payload);
        }
    }

    let total = fit_u32(out.len(), "file size")?;
    out[..4].copy_from_slice(&total.to_le_bytes());
    Ok(out)
}

fn layer_payload(layer: &Layer) -> SpriteResult<Vec<u8>> {
    let name = layer.name.as_bytes();
    let mut out = Vec::with_capacity(18 + name.len());
    put_u16(&mut out, layer.flags);
    put_u16(&mut out, layer.layer_type);
    put_u16(&mut out, layer.child_level);
    put_u16(&mut out, 0);
    put_u16(&mut out, 0);
    put_u16(&mut out, layer.blend_mode);
    out.push(layer.opacity);
    out.extend_from_slice(&[0; 3]);
    put_u16(&mut out, fit_u16(name.len(), "layer name length")?);
    out.extend_from_slice(name);
    Ok(out)
}

fn cel_payload(cel: &Cel) -> SpriteResult<Vec<u8>> {
    let pixels = cel.pixels.as_deref().unwrap_or(&[]);
    if cel.pixels.is_some() && pixels.len() != payload_len(cel.w, cel.h) {
        return Err(SpriteError::validation(format!(
            "cel on layer {} carries {} pixel bytes, expected {}",
            cel.layer_index,
            pixels.len(),
            payload_len(cel.w, cel.h)
        )));
    }

    let mut out = Vec::with_capacity(20 + pixels.len());
    put_u16(&mut out, fit_u16(cel.layer_index, "cel layer index")?);
    put_i16(&mut out, fit_i16(cel.x, "cel x")?);
    put_i16(&mut out, fit_i16(cel.y, "cel y")?);
    out.push(255); // opacity
    put_u16(&mut out, CEL_RAW);
    put_i16(&mut out, 0); // z-index
    out.extend_from_slice(&[0; 5]);
    put_u16(&mut out, fit_u16(cel.w, "cel width")?);
    put_u16(&mut out, fit_u16(cel.h, "cel height")?);
    out.extend_from_slice(pixels);
    Ok(out)
}

fn fit_u16<T>(v: T, what: &str) -> SpriteResult<u16>
where
    T: TryInto<u16> + Copy + std::fmt::Display,
{
    v.try_into()
        .map_err(|_| SpriteError::validation(format!("{what} {v} does not fit in 16 bits")))
}

fn fit_i16(v: i32, what: &str) -> SpriteResult<i16> {
    i16::try_from(v)
        .map_err(|_| SpriteError::validation(format!("{what} {v} does not fit in 16 bits")))
}

fn fit_u32(v: usize, what: &str) -> SpriteResult<u32> {
    u32::try_from(v)
        .map_err(|_| SpriteError::validation(format!("{what} {v} does not fit in 32 bits")))
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/document/encode.rs"]
mod tests;
