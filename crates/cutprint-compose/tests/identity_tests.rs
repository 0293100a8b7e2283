//! Tests that the neutral filter and frame reproduce the input layout exactly.

mod common;

use common::{PALETTE, decode, engine, filter, frame, photo_source};
use cutprint_compose::CompositionRequest;
use cutprint_core::CutType;

#[test]
fn identity_tests_grid4_tiles_inputs_unchanged() {
    let (source, uris) = photo_source(4, 100, 100);
    let request = CompositionRequest::new(CutType::Grid4, uris, filter("original"), frame("no_frame"));

    let composed = engine(source, 100).compose(&request).expect("composition succeeds");
    assert_eq!((composed.width, composed.height), (200, 200));
    assert_eq!(composed.qr_placement, None);

    let pixels = decode(&composed.bytes);
    for (x, y) in [(0, 0), (57, 99), (199, 199), (120, 30), (30, 170)] {
        let slot = (y / 100 * 2 + x / 100) as usize;
        assert_eq!(pixels.get_pixel(x, y).0, PALETTE[slot], "pixel ({x}, {y})");
    }
}

#[test]
fn identity_tests_vertical_strip_stacks_inputs() {
    let (source, uris) = photo_source(4, 90, 120);
    let request = CompositionRequest::new(CutType::Vertical4, uris, filter("original"), frame("no_frame"));

    let composed = engine(source, 90).compose(&request).expect("composition succeeds");
    assert_eq!((composed.width, composed.height), (90, 480));

    let pixels = decode(&composed.bytes);
    for row in 0..4u32 {
        assert_eq!(pixels.get_pixel(45, row * 120 + 60).0, PALETTE[row as usize]);
        assert_eq!(pixels.get_pixel(0, row * 120).0, PALETTE[row as usize]);
    }
}

#[test]
fn identity_tests_letterbox_padding_shows_frame() {
    let (source, uris) = photo_source(4, 100, 50);
    let request = CompositionRequest::new(CutType::Grid4, uris, filter("original"), frame("no_frame"));

    let composed = engine(source, 100).compose(&request).expect("composition succeeds");
    let pixels = decode(&composed.bytes);

    assert_eq!(pixels.get_pixel(50, 10).0, [255, 255, 255, 255]);
    assert_eq!(pixels.get_pixel(50, 50).0, PALETTE[0]);
    assert_eq!(pixels.get_pixel(50, 90).0, [255, 255, 255, 255]);
}
