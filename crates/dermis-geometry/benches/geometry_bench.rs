//! Criterion benchmarks for dermis-geometry: segmentation and descriptor extraction.

use criterion::{Criterion, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_ellipse_mut;

use dermis_geometry::{blur, extract_geometry, grayscale, segment_lesion};

fn make_lesion(size: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, Rgb([230, 198, 180]));
    let c = (size / 2) as i32;
    draw_filled_ellipse_mut(&mut img, (c, c), c / 2, c / 3, Rgb([80, 45, 35]));
    img
}

fn bench_preprocess(c: &mut Criterion) {
    let img = make_lesion(512);
    c.bench_function("grayscale_blur_512", |b| {
        b.iter(|| blur(&grayscale(&img)));
    });
}

fn bench_segment(c: &mut Criterion) {
    let img = make_lesion(512);
    c.bench_function("segment_lesion_512", |b| {
        b.iter(|| segment_lesion(&img));
    });
}

fn bench_extract(c: &mut Criterion) {
    let img = make_lesion(512);
    c.bench_function("extract_geometry_512", |b| {
        b.iter(|| extract_geometry(&img));
    });
}

criterion_group!(benches, bench_preprocess, bench_segment, bench_extract);
criterion_main!(benches);
