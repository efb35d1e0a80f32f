//! Tests for PNG encoding.
//!
//! Encoded images are decoded again with the `image` crate and compared
//! pixel for pixel, for both the indexed and the RGBA encodings.

use renderer::png::{encode_png_auto, encode_png_rgba};

// ============================================================================
// Helper functions
// ============================================================================

/// IHDR colour type byte: signature(8) + len(4) + type(4) + w(4) + h(4) + depth(1)
const COLOR_TYPE_OFFSET: usize = 25;

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("valid PNG")
        .to_rgba8()
}

/// A `width` x `height` image cycling through `colors` distinct greys.
fn grey_ramp(width: usize, height: usize, colors: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for i in 0..width * height {
        let c = i % colors;
        pixels.extend_from_slice(&[(c % 256) as u8, (c / 256) as u8, 0, 255]);
    }
    pixels
}

// ============================================================================
// Encoding selection
// ============================================================================

#[test]
fn test_auto_indexed_decodes_exactly() {
    let pixels = grey_ramp(40, 30, 50);
    let png = encode_png_auto(&pixels, 40, 30).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);

    let decoded = decode(&png);
    assert_eq!(decoded.dimensions(), (40, 30));
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn test_exactly_256_colours_stay_indexed() {
    let pixels = grey_ramp(256, 2, 256);
    let png = encode_png_auto(&pixels, 256, 2).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);
    assert_eq!(decode(&png).as_raw(), &pixels);
}

#[test]
fn test_257_colours_fall_back_to_rgba() {
    let pixels = grey_ramp(257, 1, 257);
    let png = encode_png_auto(&pixels, 257, 1).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 6);
    assert_eq!(decode(&png).as_raw(), &pixels);
}

#[test]
fn test_large_image_parallel_extraction() {
    // Above the parallel threshold
    let pixels = grey_ramp(200, 200, 10);
    let png = encode_png_auto(&pixels, 200, 200).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);
    assert_eq!(decode(&png).as_raw(), &pixels);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_single_pixel() {
    let png = encode_png_auto(&[10, 20, 30, 255], 1, 1).unwrap();
    assert_eq!(decode(&png).get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn test_transparency_preserved() {
    let pixels = [0, 0, 0, 0, 255, 0, 0, 128, 0, 0, 0, 0, 255, 0, 0, 128];
    let png = encode_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(decode(&png).as_raw(), &pixels.to_vec());
}

#[test]
fn test_rgba_smaller_than_raw() {
    let pixels = grey_ramp(64, 64, 4);
    let png = encode_png_rgba(&pixels, 64, 64).unwrap();
    assert!(png.len() < pixels.len());
    assert_eq!(decode(&png).as_raw(), &pixels);
}

#[test]
fn test_mismatched_buffer_rejected() {
    assert!(encode_png_auto(&[0; 15], 2, 2).is_err());
    assert!(encode_png_rgba(&[0; 20], 2, 2).is_err());
}
