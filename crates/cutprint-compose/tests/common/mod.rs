//! Shared fixtures for composition integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use cutprint_catalog::{FilterEffect, FrameStyle, global};
use cutprint_compose::{CompositionEngine, EngineOptions, MemorySource};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Distinct opaque colours, one per slot.
pub const PALETTE: [[u8; 4]; 6] = [
    [220, 40, 40, 255],
    [40, 180, 60, 255],
    [30, 60, 200, 255],
    [240, 200, 20, 255],
    [120, 30, 160, 255],
    [20, 200, 200, 255],
];

/// Encodes a single-colour PNG.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encodes");
    bytes
}

/// Registers `count` solid photos of the given size as `mem://photo-<n>`.
pub fn photo_source(count: usize, width: u32, height: u32) -> (MemorySource, Vec<String>) {
    let mut source = MemorySource::new();
    let mut uris = Vec::with_capacity(count);
    for index in 0..count {
        let uri = format!("mem://photo-{index}");
        source.insert(uri.clone(), solid_png(width, height, PALETTE[index % PALETTE.len()]));
        uris.push(uri);
    }
    (source, uris)
}

/// Engine with the given slot width and default everything else.
pub fn engine(source: MemorySource, slot_width: u32) -> CompositionEngine {
    let options = EngineOptions {
        slot_width,
        ..EngineOptions::default()
    };
    CompositionEngine::new(options, Arc::new(source))
}

/// Built-in filter by id.
pub fn filter(id: &str) -> FilterEffect {
    global().require_filter(id).expect("built-in filter").clone()
}

/// Built-in frame by id.
pub fn frame(id: &str) -> FrameStyle {
    global().require_frame(id).expect("built-in frame").clone()
}

/// Decodes composed bytes back to RGBA pixels.
pub fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).expect("output decodes").to_rgba8()
}
