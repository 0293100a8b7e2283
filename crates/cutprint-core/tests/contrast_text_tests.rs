//! Tests label text colour selection against strip backgrounds.

use cutprint_core::{Rgb, TextColor, contrast_text_color};

#[test]
fn contrast_text_tests_black_and_white_backgrounds() {
    let black = Rgb::from_hex("#000000").expect("valid colour");
    let white = Rgb::from_hex("#FFFFFF").expect("valid colour");

    assert_eq!(contrast_text_color(black), TextColor::White);
    assert_eq!(contrast_text_color(white), TextColor::Black);
    assert_eq!(contrast_text_color(white).rgb(), Rgb::BLACK);
}
