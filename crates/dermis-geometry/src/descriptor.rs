//! The five lesion descriptors and the extraction pipeline that produces them.

use std::f64::consts::PI;
use std::path::Path;

use image::{GrayImage, RgbImage};
use tracing::{debug, instrument};

use crate::color::{fill_contour, masked_channel_std};
use crate::contour::{Contour, external_contours, largest_contour};
use crate::decode::load_rgb;
use crate::error::GeometryError;
use crate::preprocess::{binarize_inverted, blur, grayscale};
use crate::shape::{convex_hull, min_area_rect_sides, polygon_area};

/// Shape and colour descriptors of the dominant lesion in an image.
///
/// `asymmetry` is the isoperimetric ratio `P² / (4πA)` (1 for a circle, larger
/// for elongated or ragged outlines) and `compactness` is its reciprocal
/// `4πA / P²`. Both are kept as separate descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LesionGeometry {
    /// Longer side of the minimum-area bounding rectangle, in pixels.
    pub diameter: f64,
    /// Isoperimetric ratio of the lesion outline.
    pub asymmetry: f64,
    /// Standard deviation of all RGB channel values inside the lesion.
    pub color_variation: f64,
    /// Fraction of the convex hull area not covered by the lesion.
    pub border_irregularity: f64,
    /// Reciprocal isoperimetric ratio.
    pub compactness: f64,
}

impl LesionGeometry {
    /// Descriptors reported when no lesion can be segmented.
    pub const ZERO: Self = Self {
        diameter: 0.0,
        asymmetry: 0.0,
        color_variation: 0.0,
        border_irregularity: 0.0,
        compactness: 0.0,
    };

    /// Return the descriptors in canonical order:
    /// diameter, asymmetry, colour variation, border irregularity, compactness.
    #[must_use]
    pub fn to_array(self) -> [f64; 5] {
        [
            self.diameter,
            self.asymmetry,
            self.color_variation,
            self.border_irregularity,
            self.compactness,
        ]
    }

    /// Return `true` if every descriptor is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// The segmented lesion: its outline and the measurements derived from it.
#[derive(Debug, Clone)]
pub struct LesionRegion {
    contour: Contour,
    area: f64,
    perimeter: f64,
    hull_area: f64,
    rect_sides: (f64, f64),
    threshold: u8,
}

impl LesionRegion {
    fn measure(contour: Contour, threshold: u8) -> Self {
        let area = contour.area();
        let perimeter = contour.perimeter();
        let hull = convex_hull(contour.points());
        let hull_area = polygon_area(&hull);
        let rect_sides = min_area_rect_sides(&hull);
        Self {
            contour,
            area,
            perimeter,
            hull_area,
            rect_sides,
            threshold,
        }
    }

    /// Return the lesion outline.
    #[must_use]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// Return the enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Return the boundary length.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Return the area of the outline's convex hull.
    #[must_use]
    pub fn hull_area(&self) -> f64 {
        self.hull_area
    }

    /// Return the side lengths of the minimum-area bounding rectangle.
    #[must_use]
    pub fn rect_sides(&self) -> (f64, f64) {
        self.rect_sides
    }

    /// Return the Otsu level the image was binarised at.
    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Longer side of the minimum-area bounding rectangle.
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.rect_sides.0.max(self.rect_sides.1)
    }

    /// `P² / (4πA)`, or 0 when either the area or the perimeter is zero.
    #[must_use]
    pub fn asymmetry(&self) -> f64 {
        if self.area > 0.0 && self.perimeter > 0.0 {
            self.perimeter.powi(2) / (4.0 * PI * self.area)
        } else {
            0.0
        }
    }

    /// `(hull area - area) / hull area`, or 0 for a zero-area hull.
    #[must_use]
    pub fn border_irregularity(&self) -> f64 {
        if self.hull_area > 0.0 {
            (self.hull_area - self.area) / self.hull_area
        } else {
            0.0
        }
    }

    /// `4πA / P²`, or 0 for a zero perimeter.
    #[must_use]
    pub fn compactness(&self) -> f64 {
        if self.perimeter > 0.0 {
            4.0 * PI * self.area / self.perimeter.powi(2)
        } else {
            0.0
        }
    }

    /// Rasterise the filled lesion outline into a `width × height` mask.
    #[must_use]
    pub fn mask(&self, width: u32, height: u32) -> GrayImage {
        fill_contour(&self.contour, width, height)
    }

    /// Compute all five descriptors, reading colour from `rgb`.
    #[must_use]
    pub fn geometry(&self, rgb: &RgbImage) -> LesionGeometry {
        let mask = self.mask(rgb.width(), rgb.height());
        LesionGeometry {
            diameter: self.diameter(),
            asymmetry: self.asymmetry(),
            color_variation: masked_channel_std(rgb, &mask),
            border_irregularity: self.border_irregularity(),
            compactness: self.compactness(),
        }
    }
}

/// Segment the dominant lesion of an RGB image.
///
/// Returns `None` when thresholding leaves no foreground region.
#[instrument(skip_all, fields(width = rgb.width(), height = rgb.height()))]
pub fn segment_lesion(rgb: &RgbImage) -> Option<LesionRegion> {
    let blurred = blur(&grayscale(rgb));
    let (mask, threshold) = binarize_inverted(&blurred);
    let contour = largest_contour(external_contours(&mask))?;
    let region = LesionRegion::measure(contour, threshold);
    debug!(
        area = region.area,
        perimeter = region.perimeter,
        hull_area = region.hull_area,
        "lesion segmented"
    );
    Some(region)
}

/// Extract the five lesion descriptors from an RGB image.
///
/// An image with no segmentable region yields [`LesionGeometry::ZERO`].
#[must_use]
pub fn extract_geometry(rgb: &RgbImage) -> LesionGeometry {
    match segment_lesion(rgb) {
        Some(region) => region.geometry(rgb),
        None => {
            debug!("no lesion contour found, reporting zero geometry");
            LesionGeometry::ZERO
        }
    }
}

/// Decode an image file and extract its lesion descriptors.
///
/// # Errors
///
/// Returns [`GeometryError::DecodeImage`] if the file cannot be decoded.
pub fn extract_geometry_from_path(path: impl AsRef<Path>) -> Result<LesionGeometry, GeometryError> {
    let rgb = load_rgb(path)?;
    Ok(extract_geometry(&rgb))
}
