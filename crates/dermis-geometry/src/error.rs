use std::path::PathBuf;

/// Errors from image decoding.
///
/// Segmentation itself never fails: an image without a detectable lesion
/// yields [`LesionGeometry::ZERO`](crate::LesionGeometry::ZERO).
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// Returned when the image file cannot be opened or decoded.
    #[error("failed to decode image {path}")]
    DecodeImage {
        /// Path to the image that could not be decoded.
        path: PathBuf,
        /// The underlying decoder error.
        source: image::ImageError,
    },

    /// Returned when an in-memory image buffer cannot be decoded.
    #[error("failed to decode image from {len} bytes")]
    DecodeBuffer {
        /// Length of the rejected buffer.
        len: usize,
        /// The underlying decoder error.
        source: image::ImageError,
    },
}
