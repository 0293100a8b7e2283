//! Tests QR sizing and placement invariants over arbitrary canvases.

use cutprint_core::{QrAnchor, calculate_qr_position, calculate_qr_size, place_qr};
use proptest::prelude::*;

#[test]
fn qr_geometry_tests_reference_canvas_bottom_right() {
    let placement = place_qr(1200, 1200, 0.1, QrAnchor::BottomRight).expect("placement");
    assert_eq!(placement.size_px, 120);
    assert_eq!((placement.x, placement.y), (1020, 1020));
}

fn anchor_strategy() -> impl Strategy<Value = QrAnchor> {
    prop_oneof![
        Just(QrAnchor::TopLeft),
        Just(QrAnchor::TopRight),
        Just(QrAnchor::BottomLeft),
        Just(QrAnchor::BottomRight),
    ]
}

proptest! {
    #[test]
    fn qr_geometry_tests_box_stays_on_canvas(
        width in 1u32..5_000,
        height in 1u32..5_000,
        ratio in 0.01f64..=1.0,
        anchor in anchor_strategy(),
    ) {
        let size = calculate_qr_size(width, height, ratio).expect("valid inputs");
        prop_assert!(size >= 50);

        let placement = calculate_qr_position(width, height, size, anchor);
        prop_assert!(placement.fits_within(width, height));
    }

    #[test]
    fn qr_geometry_tests_roomy_canvas_keeps_requested_size(
        width in 1_000u32..5_000,
        height in 1_000u32..5_000,
        anchor in anchor_strategy(),
    ) {
        let size = calculate_qr_size(width, height, 0.1).expect("valid inputs");
        let placement = calculate_qr_position(width, height, size, anchor);
        prop_assert_eq!(placement.size_px, size);
    }
}
