use crate::composite::image::FlatImage;
use crate::document::model::{Cel, Document, Frame};
use crate::foundation::error::SpriteResult;

/// Paint a frame's cels onto a transparent canvas, back to front.
///
/// Cels are stable-sorted by `layer_index`, so cels sharing an index paint in
/// encounter order. A source pixel with non-zero alpha replaces the
/// destination quadruplet outright; alpha 0 leaves it untouched. Pixels that
/// land outside the canvas are dropped and empty cels are skipped.
#[tracing::instrument(skip(frame), fields(cels = frame.cels.len()))]
pub fn composite_frame(frame: &Frame, canvas_width: u32, canvas_height: u32) -> FlatImage {
    let mut image = FlatImage::new(canvas_width, canvas_height);

    let mut order: Vec<&Cel> = frame.cels.iter().collect();
    order.sort_by_key(|cel| cel.layer_index);

    for cel in order {
        let Some(src) = cel.pixels.as_deref() else {
            tracing::trace!(layer = cel.layer_index, "skipping empty cel");
            continue;
        };
        paint_cel(&mut image, cel, src);
    }
    image
}

/// Composite the first frame of a decoded document at its canvas size.
pub fn composite_document(doc: &Document) -> SpriteResult<FlatImage> {
    let frame = doc.first_frame()?;
    Ok(composite_frame(frame, doc.width, doc.height))
}

fn paint_cel(image: &mut FlatImage, cel: &Cel, src: &[u8]) {
    if cel.w == 0 || cel.h == 0 {
        return;
    }
    let canvas = image.canvas();
    let row_bytes = cel.w as usize * 4;

    for (py, row) in src.chunks_exact(row_bytes).take(cel.h as usize).enumerate() {
        let dy = i64::from(cel.y) + py as i64;
        if dy < 0 || dy >= i64::from(canvas.height) {
            continue;
        }
        for (px, s) in row.chunks_exact(4).enumerate() {
            if s[3] == 0 {
                continue;
            }
            let dx = i64::from(cel.x) + px as i64;
            if !canvas.contains(dx, dy) {
                continue;
            }
            let di = image.index(dx as u32, dy as u32);
            image.pixels[di..di + 4].copy_from_slice(s);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/layers.rs"]
mod tests;
