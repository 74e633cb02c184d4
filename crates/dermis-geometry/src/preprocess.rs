//! Grayscale conversion, noise suppression and inverted Otsu binarisation.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::filter::separable_filter_equal;
use tracing::debug;

/// Separable 5-tap binomial kernel, the 5×5 Gaussian with size-derived sigma.
pub(crate) const BLUR_KERNEL: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Mask value marking lesion (foreground) pixels.
pub(crate) const FOREGROUND: u8 = 255;

/// Convert an RGB raster to 8-bit luminance.
///
/// Uses fixed-point BT.601 weights (`0.299 R + 0.587 G + 0.114 B`, scaled by
/// 2^14) with round-half-up, so results are exact integers.
#[must_use]
pub fn grayscale(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868;
        // Weights sum to 2^14, so the shifted value never exceeds 255.
        Luma([((weighted + 8192) >> 14) as u8])
    })
}

/// Kernel radius; also the width of the mirrored margin.
const BLUR_RADIUS: u32 = 2;

/// Smooth a grayscale raster with the fixed 5×5 blur.
///
/// Out-of-frame taps mirror the image about its edge pixels without repeating
/// them (`dcb|abcd|cba`).
#[must_use]
pub fn blur(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }
    let padded = GrayImage::from_fn(width + 2 * BLUR_RADIUS, height + 2 * BLUR_RADIUS, |x, y| {
        let sx = reflect_101(i64::from(x) - i64::from(BLUR_RADIUS), width);
        let sy = reflect_101(i64::from(y) - i64::from(BLUR_RADIUS), height);
        *gray.get_pixel(sx, sy)
    });
    let filtered = separable_filter_equal(&padded, &BLUR_KERNEL);
    image::imageops::crop_imm(&filtered, BLUR_RADIUS, BLUR_RADIUS, width, height).to_image()
}

/// Map a possibly out-of-range coordinate into `0..len` by mirroring about
/// the end pixels.
fn reflect_101(mut index: i64, len: u32) -> u32 {
    let last = i64::from(len) - 1;
    if last <= 0 {
        return 0;
    }
    while index < 0 || index > last {
        index = if index < 0 { -index } else { 2 * last - index };
    }
    // In range after the loop.
    index as u32
}

/// Binarise with an automatic Otsu level, darker pixels becoming foreground.
///
/// Returns the mask (foreground = 255) and the level used. Pixels at or
/// below the level are foreground.
#[must_use]
pub fn binarize_inverted(blurred: &GrayImage) -> (GrayImage, u8) {
    let level = otsu_level(blurred);
    let mut mask = blurred.clone();
    for pixel in mask.pixels_mut() {
        pixel.0[0] = if pixel.0[0] <= level { FOREGROUND } else { 0 };
    }
    debug!(level, "otsu threshold applied");
    (mask, level)
}
