//! Lesion segmentation and shape/colour descriptors for dermoscopic images.
//!
//! Turns an RGB raster into the five geometric descriptors of its dominant
//! lesion region: diameter, isoperimetric asymmetry, colour variation, border
//! irregularity and compactness. Segmentation is a fixed pipeline (BT.601
//! grayscale, 5×5 binomial blur, inverted Otsu threshold, external contours)
//! and the largest contour by enclosed area is taken as the lesion.

mod color;
mod contour;
mod decode;
mod descriptor;
mod error;
mod preprocess;
mod shape;

pub use contour::{Contour, external_contours, largest_contour};
pub use decode::{decode_rgb, load_rgb};
pub use descriptor::{
    LesionGeometry, LesionRegion, extract_geometry, extract_geometry_from_path, segment_lesion,
};
pub use error::GeometryError;
pub use preprocess::{binarize_inverted, blur, grayscale};
pub use shape::{convex_hull, min_area_rect_sides, perimeter, polygon_area};
