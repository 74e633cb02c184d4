//! External contour extraction and lesion selection.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;
use tracing::debug;

use crate::shape::{perimeter, polygon_area};

/// A closed region boundary as an ordered chain of pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point<i32>>,
}

impl Contour {
    /// Create a contour from boundary points in traversal order.
    #[must_use]
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Return the boundary points.
    #[must_use]
    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Return the number of boundary points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` if the contour has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Area enclosed by the contour polygon.
    #[must_use]
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Length of the closed boundary.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        perimeter(&self.points)
    }
}

/// Trace the outermost boundaries of the foreground regions of `mask`.
///
/// Any non-zero pixel is foreground. Hole borders and regions nested inside
/// holes are discarded. Contours come back in raster order of their first
/// pixel. Regions touching the frame edge are traced like interior ones.
#[must_use]
pub fn external_contours(mask: &GrayImage) -> Vec<Contour> {
    // Border following only sees regions surrounded by background.
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);

    let contours: Vec<Contour> = find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(c.points.into_iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect()))
        .collect();
    debug!(n_contours = contours.len(), "external contours traced");
    contours
}

/// Pick the contour enclosing the largest area.
///
/// Ties keep the earliest contour. Returns `None` for an empty input.
#[must_use]
pub fn largest_contour(contours: Vec<Contour>) -> Option<Contour> {
    let mut best: Option<(f64, Contour)> = None;
    for contour in contours {
        let area = contour.area();
        if best.as_ref().is_none_or(|(best_area, _)| area > *best_area) {
            best = Some((area, contour));
        }
    }
    best.map(|(_, contour)| contour)
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};
    use imageproc::point::Point;

    use super::*;

    fn square(x0: i32, y0: i32, side: i32) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ])
    }

    fn fill(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = GrayImage::new(16, 16);
        assert!(external_contours(&mask).is_empty());
    }

    #[test]
    fn two_blobs_two_contours() {
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 2, 2, 5, 5);
        fill(&mut mask, 15, 15, 8, 8);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn hole_is_not_an_external_contour() {
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 5, 5, 20, 20);
        for y in 10..20 {
            for x in 10..20 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
    }

    #[test]
    fn island_inside_hole_is_ignored() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 5, 5, 30, 30);
        for y in 10..30 {
            for x in 10..30 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        fill(&mut mask, 17, 17, 5, 5);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
    }

    #[test]
    fn region_touching_the_edge_is_traced() {
        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 0, 4, 6, 10);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        let points = contours[0].points();
        assert!(points.iter().all(|p| (0..20).contains(&p.x) && (0..20).contains(&p.y)));
        assert_eq!(points.iter().map(|p| p.x).min(), Some(0));
        assert_eq!(points.iter().map(|p| p.x).max(), Some(5));
        assert!((contours[0].area() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn full_frame_is_one_contour() {
        let mut mask = GrayImage::new(12, 8);
        fill(&mut mask, 0, 0, 12, 8);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!((contours[0].area() - 77.0).abs() < 1e-9);
    }

    #[test]
    fn largest_by_area_wins() {
        let picked = largest_contour(vec![square(0, 0, 3), square(10, 10, 9), square(30, 0, 5)]);
        assert_eq!(picked, Some(square(10, 10, 9)));
    }

    #[test]
    fn tie_keeps_first() {
        let picked = largest_contour(vec![square(0, 0, 4), square(20, 20, 4)]);
        assert_eq!(picked, Some(square(0, 0, 4)));
    }

    #[test]
    fn largest_of_nothing_is_none() {
        assert_eq!(largest_contour(Vec::new()), None);
    }
}
