use super::*;

#[test]
fn new_image_is_transparent() {
    let img = FlatImage::new(3, 2);
    assert_eq!(img.pixels.len(), 24);
    assert!(img.pixels.iter().all(|&b| b == 0));
    assert_eq!(img.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(img.pixel(3, 0), None);
}

#[test]
fn validate_rejects_short_buffer() {
    let img = FlatImage {
        width: 2,
        height: 2,
        pixels: vec![0; 15],
    };
    assert!(matches!(img.validate(), Err(SpriteError::Validation(_))));
}

#[test]
fn to_rgba_image_preserves_pixels() {
    let mut img = FlatImage::new(2, 1);
    img.pixels[4..8].copy_from_slice(&[10, 20, 30, 40]);
    let rgba = img.to_rgba_image().unwrap();
    assert_eq!(rgba.dimensions(), (2, 1));
    assert_eq!(rgba.get_pixel(1, 0).0, [10, 20, 30, 40]);
}

#[test]
fn record_serializes_flat_pixel_array() {
    let mut img = FlatImage::new(1, 1);
    img.pixels.copy_from_slice(&[1, 2, 3, 4]);
    let json = serde_json::to_value(img.to_record()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "width": 1,
            "height": 1,
            "frames": [{ "pixels": [1, 2, 3, 4] }]
        })
    );
}
