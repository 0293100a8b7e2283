//! Per-pixel filter adjustments.
//!
//! Colour operations follow the CSS filter-effects matrices so catalog values
//! look the same as in the web preview. Order: blur, grayscale, sepia,
//! saturate, hue-rotate, brightness, contrast.

use cutprint_catalog::{ColorOverlay, FilterTransform};
use cutprint_core::SlotRect;
use image::{RgbaImage, imageops};

type Matrix = [[f32; 3]; 3];

const IDENTITY: Matrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Applies every numeric adjustment of `transform` to `photo` in place.
///
/// The overlay is not applied here; see [`apply_overlay`].
pub fn apply_adjustments(photo: &mut RgbaImage, transform: &FilterTransform) {
    if let Some(sigma) = transform.blur
        && sigma > 0.0
    {
        *photo = imageops::blur(&*photo, sigma);
    }

    let matrix = color_matrix(transform);
    let brightness = transform.brightness.unwrap_or(1.0);
    let contrast = transform.contrast.unwrap_or(1.0);

    if matrix == IDENTITY && brightness == 1.0 && contrast == 1.0 {
        return;
    }

    for pixel in photo.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let input = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];

        let mut out = [0.0_f32; 3];
        for (channel, row) in out.iter_mut().zip(matrix.iter()) {
            let mixed = row[0] * input[0] + row[1] * input[1] + row[2] * input[2];
            let lit = mixed * brightness;
            *channel = (lit - 0.5) * contrast + 0.5;
        }

        pixel.0 = [to_byte(out[0]), to_byte(out[1]), to_byte(out[2]), a];
    }
}

/// Alpha-blends `overlay` over `rect` of `canvas`:
/// `out = src * (1 - opacity) + color * opacity`.
pub fn apply_overlay(canvas: &mut RgbaImage, rect: SlotRect, overlay: ColorOverlay) {
    let opacity = overlay.opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }

    let color = [overlay.color.r, overlay.color.g, overlay.color.b];
    let x_end = (rect.x + rect.width).min(canvas.width());
    let y_end = (rect.y + rect.height).min(canvas.height());

    for y in rect.y..y_end {
        for x in rect.x..x_end {
            let pixel = canvas.get_pixel_mut(x, y);
            for channel in 0..3 {
                let src = pixel.0[channel] as f32;
                let blended = src * (1.0 - opacity) + color[channel] as f32 * opacity;
                pixel.0[channel] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn color_matrix(transform: &FilterTransform) -> Matrix {
    let mut matrix = IDENTITY;

    if let Some(amount) = transform.grayscale
        && amount > 0.0
    {
        matrix = multiply(&grayscale(amount), &matrix);
    }
    if let Some(amount) = transform.sepia
        && amount > 0.0
    {
        matrix = multiply(&sepia(amount), &matrix);
    }
    if let Some(amount) = transform.saturation
        && amount != 1.0
    {
        matrix = multiply(&saturate(amount), &matrix);
    }
    if let Some(degrees) = transform.hue
        && degrees != 0.0
    {
        matrix = multiply(&hue_rotate(degrees), &matrix);
    }

    matrix
}

fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn grayscale(amount: f32) -> Matrix {
    let inv = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * inv, 0.7152 - 0.7152 * inv, 0.0722 - 0.0722 * inv],
        [0.2126 - 0.2126 * inv, 0.7152 + 0.2848 * inv, 0.0722 - 0.0722 * inv],
        [0.2126 - 0.2126 * inv, 0.7152 - 0.7152 * inv, 0.0722 + 0.9278 * inv],
    ]
}

fn sepia(amount: f32) -> Matrix {
    let inv = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * inv, 0.769 - 0.769 * inv, 0.189 - 0.189 * inv],
        [0.349 - 0.349 * inv, 0.686 + 0.314 * inv, 0.168 - 0.168 * inv],
        [0.272 - 0.272 * inv, 0.534 - 0.534 * inv, 0.131 + 0.869 * inv],
    ]
}

fn saturate(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}
