//! Built-in filter and frame tables.

use cutprint_core::Rgb;

use crate::filter::{ColorOverlay, FilterCategory, FilterEffect, FilterTransform};
use crate::frame::{FrameCategory, FrameKind, FrameStyle, GradientDirection, PatternKind, TextureKind};

fn filter(
    id: &str,
    name: &str,
    category: FilterCategory,
    description: &str,
    transform: FilterTransform,
) -> FilterEffect {
    FilterEffect {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        transform,
    }
}

fn frame(id: &str, name: &str, category: FrameCategory, description: &str, style: FrameKind) -> FrameStyle {
    FrameStyle {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        style,
    }
}

fn tint(hex: u32, opacity: f32) -> Option<ColorOverlay> {
    Some(ColorOverlay {
        color: rgb(hex),
        opacity,
    })
}

const fn rgb(hex: u32) -> Rgb {
    Rgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub(crate) fn filters() -> Vec<FilterEffect> {
    use FilterCategory::*;

    vec![
        filter("original", "Original", Basic, "No adjustment", FilterTransform::default()),
        filter(
            "bright",
            "Bright",
            Basic,
            "Lifted exposure",
            FilterTransform {
                brightness: Some(1.15),
                contrast: Some(1.05),
                ..FilterTransform::default()
            },
        ),
        filter(
            "vivid",
            "Vivid",
            Basic,
            "Punchy colour",
            FilterTransform {
                saturation: Some(1.4),
                contrast: Some(1.1),
                ..FilterTransform::default()
            },
        ),
        filter(
            "soft",
            "Soft",
            Basic,
            "Gentle blur for skin",
            FilterTransform {
                brightness: Some(1.05),
                blur: Some(0.8),
                ..FilterTransform::default()
            },
        ),
        filter(
            "warm_peach",
            "Peach",
            Warm,
            "Soft peach cast",
            FilterTransform {
                saturation: Some(1.1),
                overlay: tint(0xFFB38A, 0.15),
                ..FilterTransform::default()
            },
        ),
        filter(
            "warm_golden",
            "Golden Hour",
            Warm,
            "Late afternoon glow",
            FilterTransform {
                brightness: Some(1.05),
                sepia: Some(0.2),
                overlay: tint(0xFFC857, 0.12),
                ..FilterTransform::default()
            },
        ),
        filter(
            "cool_mint",
            "Mint",
            Cool,
            "Fresh green-blue cast",
            FilterTransform {
                hue: Some(-10.0),
                overlay: tint(0x9FE2BF, 0.12),
                ..FilterTransform::default()
            },
        ),
        filter(
            "cool_blue",
            "Blue Mood",
            Cool,
            "Cold blue cast",
            FilterTransform {
                saturation: Some(0.9),
                overlay: tint(0x5B8DEF, 0.15),
                ..FilterTransform::default()
            },
        ),
        filter(
            "bw_classic",
            "Classic B&W",
            Mono,
            "Neutral black and white",
            FilterTransform {
                grayscale: Some(1.0),
                contrast: Some(1.1),
                ..FilterTransform::default()
            },
        ),
        filter(
            "bw_noir",
            "Noir",
            Mono,
            "High contrast black and white",
            FilterTransform {
                grayscale: Some(1.0),
                contrast: Some(1.5),
                brightness: Some(0.9),
                ..FilterTransform::default()
            },
        ),
        filter(
            "vintage_sepia",
            "Sepia",
            Vintage,
            "Brown-toned print",
            FilterTransform {
                sepia: Some(0.8),
                ..FilterTransform::default()
            },
        ),
        filter(
            "vintage_fade",
            "Faded Film",
            Vintage,
            "Washed-out film stock",
            FilterTransform {
                contrast: Some(0.8),
                saturation: Some(0.7),
                overlay: tint(0xF4E1C1, 0.2),
                ..FilterTransform::default()
            },
        ),
    ]
}

pub(crate) fn frames() -> Vec<FrameStyle> {
    use FrameCategory::*;

    vec![
        frame(
            "no_frame",
            "No Frame",
            Basic,
            "Photos edge to edge",
            FrameKind::Solid {
                border_width: 0,
                border_color: Rgb::WHITE,
            },
        ),
        frame(
            "thin_black",
            "Thin Black",
            Basic,
            "Narrow black border",
            FrameKind::Solid {
                border_width: 4,
                border_color: Rgb::BLACK,
            },
        ),
        frame(
            "thin_white",
            "Thin White",
            Basic,
            "Narrow white border",
            FrameKind::Solid {
                border_width: 4,
                border_color: Rgb::WHITE,
            },
        ),
        frame(
            "classic_black",
            "Classic Black",
            Basic,
            "Wide black border",
            FrameKind::Solid {
                border_width: 24,
                border_color: Rgb::BLACK,
            },
        ),
        frame(
            "classic_white",
            "Classic White",
            Basic,
            "Wide white border",
            FrameKind::Solid {
                border_width: 24,
                border_color: Rgb::WHITE,
            },
        ),
        frame(
            "pastel_pink",
            "Pastel Pink",
            Color,
            "Soft pink border",
            FrameKind::Solid {
                border_width: 20,
                border_color: rgb(0xF8C8DC),
            },
        ),
        frame(
            "sky_blue",
            "Sky Blue",
            Color,
            "Light blue border",
            FrameKind::Solid {
                border_width: 20,
                border_color: rgb(0xA7D8F0),
            },
        ),
        frame(
            "sunset_gradient",
            "Sunset",
            Gradient,
            "Orange to purple",
            FrameKind::Gradient {
                border_width: 20,
                colors: vec![rgb(0xFF7E5F), rgb(0xFEB47B), rgb(0x8E54E9)],
                direction: GradientDirection::Vertical,
            },
        ),
        frame(
            "ocean_gradient",
            "Ocean",
            Gradient,
            "Teal to navy",
            FrameKind::Gradient {
                border_width: 20,
                colors: vec![rgb(0x43CEA2), rgb(0x185A9D)],
                direction: GradientDirection::Diagonal,
            },
        ),
        frame(
            "rainbow_glow",
            "Rainbow",
            Gradient,
            "Rainbow glow from the centre",
            FrameKind::Gradient {
                border_width: 20,
                colors: vec![
                    rgb(0xFF595E),
                    rgb(0xFFCA3A),
                    rgb(0x8AC926),
                    rgb(0x1982C4),
                    rgb(0x6A4C93),
                ],
                direction: GradientDirection::Radial,
            },
        ),
        frame(
            "polka_dots",
            "Polka Dots",
            Pattern,
            "White dots on pink",
            FrameKind::Pattern {
                border_width: 24,
                pattern: PatternKind::Dots,
                background: rgb(0xFF8FAB),
                foreground: Rgb::WHITE,
                spacing: 16,
            },
        ),
        frame(
            "candy_stripes",
            "Candy Stripes",
            Pattern,
            "Diagonal red and white stripes",
            FrameKind::Pattern {
                border_width: 24,
                pattern: PatternKind::Stripes,
                background: Rgb::WHITE,
                foreground: rgb(0xE63946),
                spacing: 14,
            },
        ),
        frame(
            "checkerboard",
            "Checkerboard",
            Pattern,
            "Black and white squares",
            FrameKind::Pattern {
                border_width: 24,
                pattern: PatternKind::Checker,
                background: Rgb::WHITE,
                foreground: Rgb::BLACK,
                spacing: 12,
            },
        ),
        frame(
            "paper_cream",
            "Cream Paper",
            Texture,
            "Grainy cream paper",
            FrameKind::Texture {
                border_width: 28,
                texture: TextureKind::Paper,
                color: rgb(0xF5EBDD),
            },
        ),
        frame(
            "film_strip",
            "Film Strip",
            Texture,
            "35mm film with sprocket holes",
            FrameKind::Texture {
                border_width: 32,
                texture: TextureKind::Film,
                color: rgb(0x111111),
            },
        ),
        frame(
            "linen_grey",
            "Grey Linen",
            Texture,
            "Woven grey linen",
            FrameKind::Texture {
                border_width: 28,
                texture: TextureKind::Linen,
                color: rgb(0xC9C9C9),
            },
        ),
    ]
}
