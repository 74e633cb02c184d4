//! Criterion benchmarks for dermis-ensemble: feature assembly and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use dermis_ensemble::{Ensemble, FEATURE_COUNT, FeatureVector, assemble_features};
use dermis_model::{DecisionTree, KNearestNeighbors, Label, Node, RandomForest, StandardScaler, Weighting};

fn make_ensemble() -> Ensemble {
    let samples: Vec<Vec<f64>> = (0..500)
        .map(|i| (0..FEATURE_COUNT).map(|f| ((i * 7 + f * 13) % 97) as f64 / 48.5 - 1.0).collect())
        .collect();
    let labels = samples
        .iter()
        .map(|s| if s[2] > 0.0 { Label::Malignant } else { Label::Benign })
        .collect();
    let scaler = StandardScaler::fit(&samples).unwrap();
    let knn = KNearestNeighbors::new(samples, labels, 5, Weighting::Distance).unwrap();
    let trees = (0..FEATURE_COUNT)
        .map(|f| {
            DecisionTree::new(
                vec![Node::split(f, 0.0, 1, 2), Node::leaf([0.8, 0.2]), Node::leaf([0.3, 0.7])],
                FEATURE_COUNT,
            )
            .unwrap()
        })
        .collect();
    let forest = RandomForest::new(trees).unwrap();
    Ensemble::new(scaler, knn, forest).unwrap()
}

fn bench_predict(c: &mut Criterion) {
    let ensemble = make_ensemble();
    let vector = FeatureVector::new([45.0, 1.0, 0.4, 1.3, 22.0, 0.08, 0.77]);
    c.bench_function("ensemble_predict_knn500_forest7", |b| {
        b.iter(|| ensemble.predict(&vector).unwrap());
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let ensemble = make_ensemble();
    let vectors: Vec<FeatureVector> = (0..256)
        .map(|i| FeatureVector::new([40.0, 0.0, f64::from(i) / 128.0 - 1.0, 1.1, 15.0, 0.05, 0.9]))
        .collect();
    c.bench_function("ensemble_predict_batch_256", |b| {
        b.iter(|| ensemble.predict_batch(&vectors));
    });
}

fn bench_assemble(c: &mut Criterion) {
    let mut img = RgbImage::from_pixel(384, 384, Rgb([232, 205, 190]));
    draw_filled_circle_mut(&mut img, (192, 192), 90, Rgb([70, 45, 35]));
    c.bench_function("assemble_features_384", |b| {
        b.iter(|| assemble_features(&img, 52.0, "female"));
    });
}

criterion_group!(benches, bench_predict, bench_predict_batch, bench_assemble);
criterion_main!(benches);
