//! Lesion mask rasterisation and colour statistics.

use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::contour::Contour;
use crate::preprocess::FOREGROUND;

/// Rasterise the filled interior of `contour`, boundary pixels included.
pub(crate) fn fill_contour(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    // The polygon filler rejects closing duplicates, so collapse repeats first.
    let mut polygon: Vec<Point<i32>> = Vec::with_capacity(contour.len());
    for &p in contour.points() {
        if polygon.last() != Some(&p) {
            polygon.push(p);
        }
    }
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    if polygon.len() >= 3 {
        draw_polygon_mut(&mut mask, &polygon, Luma([FOREGROUND]));
    }

    for p in contour.points() {
        if let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y))
            && x < width
            && y < height
        {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }
    mask
}

/// Population standard deviation of every channel value under the mask.
///
/// All three channels of all masked pixels are pooled into one sample.
/// Returns 0 when the mask selects nothing.
pub(crate) fn masked_channel_std(rgb: &RgbImage, mask: &GrayImage) -> f64 {
    let values: Vec<f64> = rgb
        .pixels()
        .zip(mask.pixels())
        .filter(|(_, m)| m.0[0] == FOREGROUND)
        .flat_map(|(p, _)| p.0.map(f64::from))
        .collect();

    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use imageproc::point::Point;

    use super::*;

    fn count_foreground(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    }

    #[test]
    fn fill_square_includes_boundary() {
        let contour = Contour::new(vec![
            Point::new(2, 2),
            Point::new(6, 2),
            Point::new(6, 6),
            Point::new(2, 6),
        ]);
        let mask = fill_contour(&contour, 10, 10);
        assert_eq!(count_foreground(&mask), 25);
        assert_eq!(mask.get_pixel(2, 2).0[0], FOREGROUND);
        assert_eq!(mask.get_pixel(4, 4).0[0], FOREGROUND);
        assert_eq!(mask.get_pixel(7, 7).0[0], 0);
    }

    #[test]
    fn fill_single_point_contour() {
        let contour = Contour::new(vec![Point::new(3, 4)]);
        let mask = fill_contour(&contour, 8, 8);
        assert_eq!(count_foreground(&mask), 1);
        assert_eq!(mask.get_pixel(3, 4).0[0], FOREGROUND);
    }

    #[test]
    fn fill_closed_duplicate_is_tolerated() {
        let contour = Contour::new(vec![
            Point::new(1, 1),
            Point::new(4, 1),
            Point::new(4, 4),
            Point::new(1, 1),
        ]);
        let mask = fill_contour(&contour, 6, 6);
        assert!(count_foreground(&mask) >= 4);
    }

    #[test]
    fn std_of_uniform_region_is_zero() {
        let rgb = RgbImage::from_pixel(4, 4, Rgb([90, 90, 90]));
        let mask = GrayImage::from_pixel(4, 4, Luma([FOREGROUND]));
        assert_eq!(masked_channel_std(&rgb, &mask), 0.0);
    }

    #[test]
    fn std_pools_channels() {
        // Values {0, 0, 100} per pixel: mean 100/3, population std = 47.1405
        let rgb = RgbImage::from_pixel(2, 2, Rgb([0, 0, 100]));
        let mask = GrayImage::from_pixel(2, 2, Luma([FOREGROUND]));
        let expected = (20000.0f64 / 9.0).sqrt();
        assert!((masked_channel_std(&rgb, &mask) - expected).abs() < 1e-9);
    }

    #[test]
    fn std_only_counts_masked_pixels() {
        let mut rgb = RgbImage::from_pixel(4, 1, Rgb([50, 50, 50]));
        rgb.put_pixel(3, 0, Rgb([255, 0, 255]));
        let mut mask = GrayImage::from_pixel(4, 1, Luma([FOREGROUND]));
        mask.put_pixel(3, 0, Luma([0]));
        assert_eq!(masked_channel_std(&rgb, &mask), 0.0);
    }

    #[test]
    fn std_of_empty_mask_is_zero() {
        let rgb = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let mask = GrayImage::new(4, 4);
        assert_eq!(masked_channel_std(&rgb, &mask), 0.0);
    }
}
