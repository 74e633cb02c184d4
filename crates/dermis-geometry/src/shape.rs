//! Polygon measurements over integer contours.

use imageproc::point::Point;

/// Area enclosed by a closed polygon (shoelace formula, always non-negative).
///
/// Fewer than three points enclose nothing.
#[must_use]
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y))
        .sum();
    twice.abs() as f64 / 2.0
}

/// Length of the closed boundary through `points`.
#[must_use]
pub fn perimeter(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    imageproc::geometry::arc_length(points, true)
}

/// Convex hull of a point set.
///
/// Duplicate points are removed first; sets with fewer than three distinct
/// points are returned as-is.
#[must_use]
pub fn convex_hull(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut distinct = points.to_vec();
    distinct.sort_by_key(|p| (p.x, p.y));
    distinct.dedup();
    if distinct.len() < 3 {
        return distinct;
    }
    imageproc::geometry::convex_hull(distinct.as_slice())
}

/// Side lengths of the minimum-area enclosing rectangle of a convex hull.
///
/// Rotating calipers: one rectangle side is flush with some hull edge. The
/// first edge reaching the minimum area wins. A single point gives `(0, 0)`
/// and two points give `(distance, 0)`.
#[must_use]
pub fn min_area_rect_sides(hull: &[Point<i32>]) -> (f64, f64) {
    let pts: Vec<(f64, f64)> = hull
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();

    match pts.as_slice() {
        [] | [_] => (0.0, 0.0),
        [a, b] => ((b.0 - a.0).hypot(b.1 - a.1), 0.0),
        _ => {
            let n = pts.len();
            let mut best: Option<(f64, f64, f64)> = None;
            for i in 0..n {
                let (x0, y0) = pts[i];
                let (x1, y1) = pts[(i + 1) % n];
                let len = (x1 - x0).hypot(y1 - y0);
                if len == 0.0 {
                    continue;
                }
                let (ux, uy) = ((x1 - x0) / len, (y1 - y0) / len);

                let mut min_u = f64::INFINITY;
                let mut max_u = f64::NEG_INFINITY;
                let mut min_v = f64::INFINITY;
                let mut max_v = f64::NEG_INFINITY;
                for &(x, y) in &pts {
                    let u = x * ux + y * uy;
                    let v = y * ux - x * uy;
                    min_u = min_u.min(u);
                    max_u = max_u.max(u);
                    min_v = min_v.min(v);
                    max_v = max_v.max(v);
                }

                let (w, h) = (max_u - min_u, max_v - min_v);
                let area = w * h;
                if best.is_none_or(|(best_area, _, _)| area < best_area) {
                    best = Some((area, w, h));
                }
            }
            best.map_or((0.0, 0.0), |(_, w, h)| (w, h))
        }
    }
}
