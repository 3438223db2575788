use super::*;
use crate::document::encode::encode_document;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.repeat((w * h) as usize)
}

fn sample_doc() -> Document {
    Document {
        width: 8,
        height: 6,
        layers: vec![
            Layer {
                name: "background".to_string(),
                flags: 1,
                opacity: 255,
                ..Layer::default()
            },
            Layer {
                name: "ink".to_string(),
                flags: 3,
                opacity: 200,
                blend_mode: 1,
                ..Layer::default()
            },
        ],
        frames: vec![
            Frame {
                duration_ms: 100,
                cels: vec![
                    Cel::with_pixels(1, (-2, 3), (2, 2), solid(2, 2, [9, 8, 7, 255])).unwrap(),
                    Cel::with_pixels(0, (0, 0), (8, 6), solid(8, 6, [1, 2, 3, 255])).unwrap(),
                    Cel::empty(2, (1, 1), (3, 3)),
                ],
            },
            Frame {
                duration_ms: 250,
                cels: vec![Cel::with_pixels(0, (4, 4), (1, 1), vec![5, 5, 5, 5]).unwrap()],
            },
        ],
    }
}

fn cel_header(layer: u16, x: i16, y: i16, cel_type: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&layer.to_le_bytes());
    out.extend_from_slice(&x.to_le_bytes());
    out.extend_from_slice(&y.to_le_bytes());
    out.push(255);
    out.extend_from_slice(&cel_type.to_le_bytes());
    out.extend_from_slice(&0i16.to_le_bytes());
    out.extend_from_slice(&[0; 5]);
    out
}

// Appends a hand-written frame and patches the file header to account for it.
fn append_frame(bytes: &mut Vec<u8>, chunks: &[(u16, Vec<u8>)]) {
    let body: usize = chunks.iter().map(|(_, p)| 6 + p.len()).sum();
    bytes.extend_from_slice(&((16 + body) as u32).to_le_bytes());
    bytes.extend_from_slice(&0xF1FAu16.to_le_bytes());
    bytes.extend_from_slice(&(chunks.len() as u16).to_le_bytes());
    bytes.extend_from_slice(&100u16.to_le_bytes());
    bytes.extend_from_slice(&[0; 2]);
    bytes.extend_from_slice(&(chunks.len() as u32).to_le_bytes());
    for (kind, payload) in chunks {
        bytes.extend_from_slice(&((6 + payload.len()) as u32).to_le_bytes());
        bytes.extend_from_slice(&kind.to_le_bytes());
        bytes.extend_from_slice(payload);
    }

    let frames = u16::from_le_bytes([bytes[6], bytes[7]]) + 1;
    bytes[6..8].copy_from_slice(&frames.to_le_bytes());
    let total = bytes.len() as u32;
    bytes[..4].copy_from_slice(&total.to_le_bytes());
}

fn single_cel_doc() -> Vec<u8> {
    encode_document(&Document {
        width: 4,
        height: 4,
        layers: vec![Layer::default()],
        frames: vec![Frame {
            duration_ms: 100,
            cels: vec![Cel::with_pixels(0, (1, 1), (2, 2), solid(2, 2, [10, 20, 30, 255])).unwrap()],
        }],
    })
    .unwrap()
}

fn assert_malformed(bytes: &[u8], needle: &str) {
    match decode_document(bytes) {
        Err(SpriteError::Malformed(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}")
        }
        other => panic!("expected malformed document, got {other:?}"),
    }
}

#[test]
fn decodes_encoded_document() {
    let doc = sample_doc();
    let bytes = encode_document(&doc).unwrap();
    assert_eq!(decode_document(&bytes).unwrap(), doc);
}

#[test]
fn cel_payload_is_row_major_rgba() {
    let pixels: Vec<u8> = (0u8..24).collect();
    let doc = Document {
        width: 3,
        height: 2,
        layers: Vec::new(),
        frames: vec![Frame {
            duration_ms: 0,
            cels: vec![Cel::with_pixels(0, (0, 0), (3, 2), pixels).unwrap()],
        }],
    };
    let decoded = decode_document(&encode_document(&doc).unwrap()).unwrap();
    let cel = &decoded.frames[0].cels[0];
    assert_eq!(cel.pixel(0, 0), Some([0, 1, 2, 3]));
    assert_eq!(cel.pixel(2, 0), Some([8, 9, 10, 11]));
    assert_eq!(cel.pixel(0, 1), Some([12, 13, 14, 15]));
}

#[test]
fn empty_buffer_is_malformed() {
    assert_malformed(&[], "truncated file header");
}

#[test]
fn truncated_buffer_is_malformed() {
    let bytes = single_cel_doc();
    assert_malformed(&bytes[..bytes.len() - 1], "header declares");
    assert_malformed(&bytes[..64], "truncated file header");
}

#[test]
fn bad_magic_is_malformed() {
    let mut bytes = single_cel_doc();
    bytes[4] = 0;
    assert_malformed(&bytes, "bad file magic");
}

#[test]
fn bad_frame_magic_is_malformed() {
    let mut bytes = single_cel_doc();
    bytes[132] = 0;
    assert_malformed(&bytes, "bad frame magic");
}

#[test]
fn non_rgba_color_depth_is_malformed() {
    let mut bytes = single_cel_doc();
    bytes[12..14].copy_from_slice(&8u16.to_le_bytes());
    assert_malformed(&bytes, "unsupported color depth");
}

#[test]
fn zero_width_canvas_is_malformed() {
    let mut bytes = single_cel_doc();
    bytes[8..10].copy_from_slice(&0u16.to_le_bytes());
    assert_malformed(&bytes, "canvas must be non-empty");
}

#[test]
fn corrupt_chunk_length_is_malformed() {
    // First chunk of the first frame starts right after the two headers.
    let mut bytes = single_cel_doc();
    bytes[144..148].copy_from_slice(&3u32.to_le_bytes());
    assert_malformed(&bytes, "smaller than its header");

    let mut bytes = single_cel_doc();
    bytes[144..148].copy_from_slice(&10_000u32.to_le_bytes());
    assert_malformed(&bytes, "truncated chunk payload");
}

#[test]
fn frame_size_past_end_is_malformed() {
    let mut bytes = single_cel_doc();
    bytes[128..132].copy_from_slice(&10_000u32.to_le_bytes());
    assert_malformed(&bytes, "truncated frame body");
}

#[test]
fn zero_frames_is_no_frames() {
    let doc = Document {
        width: 4,
        height: 4,
        layers: Vec::new(),
        frames: Vec::new(),
    };
    let bytes = encode_document(&doc).unwrap();
    assert!(matches!(decode_document(&bytes), Err(SpriteError::NoFrames)));
}

#[test]
fn unknown_chunks_are_skipped() {
    let mut bytes = single_cel_doc();
    let mut cel = cel_header(0, 0, 0, 0);
    cel.extend_from_slice(&1u16.to_le_bytes());
    cel.extend_from_slice(&1u16.to_le_bytes());
    cel.extend_from_slice(&[1, 1, 1, 255]);
    append_frame(&mut bytes, &[(0x2018, vec![0xAA; 12]), (0x2005, cel)]);

    let doc = decode_document(&bytes).unwrap();
    assert_eq!(doc.frames.len(), 2);
    assert_eq!(doc.frames[1].cels.len(), 1);
    assert_eq!(doc.frames[1].cels[0].pixel(0, 0), Some([1, 1, 1, 255]));
}

#[test]
fn raw_cel_without_payload_is_empty() {
    let mut bytes = single_cel_doc();
    let mut cel = cel_header(0, 2, 2, 0);
    cel.extend_from_slice(&5u16.to_le_bytes());
    cel.extend_from_slice(&5u16.to_le_bytes());
    append_frame(&mut bytes, &[(0x2005, cel)]);

    let doc = decode_document(&bytes).unwrap();
    let cel = &doc.frames[1].cels[0];
    assert!(cel.is_empty());
    assert_eq!((cel.w, cel.h), (5, 5));
}

#[test]
fn raw_cel_with_short_payload_is_malformed() {
    let mut bytes = single_cel_doc();
    let mut cel = cel_header(0, 0, 0, 0);
    cel.extend_from_slice(&2u16.to_le_bytes());
    cel.extend_from_slice(&2u16.to_le_bytes());
    cel.extend_from_slice(&[0; 12]);
    append_frame(&mut bytes, &[(0x2005, cel)]);
    assert_malformed(&bytes, "expected 16");
}

#[test]
fn linked_cel_copies_earlier_frame() {
    let mut bytes = single_cel_doc();
    let mut linked = cel_header(0, 1, 1, 1);
    linked.extend_from_slice(&0u16.to_le_bytes());
    append_frame(&mut bytes, &[(0x2005, linked)]);

    let doc = decode_document(&bytes).unwrap();
    assert_eq!(doc.frames[1].cels[0], doc.frames[0].cels[0]);
}

#[test]
fn dangling_linked_cel_is_malformed() {
    let mut bytes = single_cel_doc();
    let mut linked = cel_header(3, 0, 0, 1);
    linked.extend_from_slice(&0u16.to_le_bytes());
    append_frame(&mut bytes, &[(0x2005, linked)]);
    assert_malformed(&bytes, "no cel on layer 3");
}

#[test]
fn compressed_cel_is_rejected() {
    let mut bytes = single_cel_doc();
    let mut cel = cel_header(0, 0, 0, 2);
    cel.extend_from_slice(&1u16.to_le_bytes());
    cel.extend_from_slice(&1u16.to_le_bytes());
    cel.extend_from_slice(&[0x78, 0x9C, 0, 0]);
    append_frame(&mut bytes, &[(0x2005, cel)]);
    assert_malformed(&bytes, "not supported");
}
