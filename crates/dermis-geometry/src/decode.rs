//! Image decoding into the RGB layout used by the extractor.

use std::path::Path;

use image::RgbImage;
use tracing::{debug, instrument};

use crate::error::GeometryError;

/// Decode an image file into an 8-bit RGB raster.
///
/// Alpha channels are dropped and single-channel sources are replicated
/// across R, G and B.
///
/// # Errors
///
/// Returns [`GeometryError::DecodeImage`] when the file is missing, unreadable
/// or not in a supported format.
#[instrument(fields(path = %path.as_ref().display()))]
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, GeometryError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| GeometryError::DecodeImage {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rgb = image.to_rgb8();
    debug!(width = rgb.width(), height = rgb.height(), "image decoded");
    Ok(rgb)
}

/// Decode an encoded image held in memory (PNG, JPEG, ...) into RGB.
///
/// # Errors
///
/// Returns [`GeometryError::DecodeBuffer`] when the format cannot be guessed
/// or the payload is corrupt.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, GeometryError> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgb8())
        .map_err(|e| GeometryError::DecodeBuffer {
            len: bytes.len(),
            source: e,
        })
}
