use super::*;

fn opaque(width: u32, height: u32, px: [u8; 4]) -> FlatImage {
    FlatImage {
        width,
        height,
        pixels: px.repeat((width * height) as usize),
    }
}

#[test]
fn zero_size_scratch_is_rejected() {
    assert!(matches!(
        TileScratch::new(0),
        Err(SpriteError::Validation(_))
    ));
}

#[test]
fn refill_clears_previous_tile() {
    let img = opaque(3, 3, [7, 7, 7, 255]);
    let mut scratch = TileScratch::new(2).unwrap();
    assert_eq!(scratch.size(), 2);

    let full = scratch.fill(&img, 0, 0);
    assert!(full.pixels.iter().all(|&b| b == 7 || b == 255));

    // Tile at (2, 2) has a single valid pixel; the rest must be padding.
    let edge = scratch.fill(&img, 2, 2).to_tile();
    assert_eq!(edge.pixel(0, 0), Some([7, 7, 7, 255]));
    assert_eq!(edge.pixel(1, 0), Some([0, 0, 0, 0]));
    assert_eq!(edge.pixel(0, 1), Some([0, 0, 0, 0]));
    assert_eq!(edge.pixel(1, 1), Some([0, 0, 0, 0]));
}

#[test]
fn origin_outside_image_is_all_padding() {
    let img = opaque(2, 2, [1, 1, 1, 1]);
    let mut scratch = TileScratch::new(2).unwrap();
    let view = scratch.fill(&img, 4, 0);
    assert!(view.pixels.iter().all(|&b| b == 0));
}

#[test]
fn view_reports_origin_and_name() {
    let img = opaque(4, 4, [1, 1, 1, 1]);
    let mut scratch = TileScratch::new(2).unwrap();
    let view = scratch.fill(&img, 2, 0);
    assert_eq!((view.origin_x, view.origin_y, view.size), (2, 0, 2));
    assert_eq!(view.file_name(), "tile_0_2.bin");
}
