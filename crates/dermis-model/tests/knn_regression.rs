//! Accuracy regression for k-nearest-neighbours on a deterministic dataset.
//!
//! Guards the distance, ordering and weighting logic against changes that
//! would silently degrade classification.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dermis_model::{Classifier, KNearestNeighbors, Label, StandardScaler, Weighting};

/// Two Gaussian-ish blobs in 7 dimensions, centred at -1 and +1 on the first
/// three features; the remaining features are noise on a much larger scale.
fn make_blobs(n: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<Label>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let label = if i % 2 == 0 { Label::Benign } else { Label::Malignant };
        let centre = if label.is_malignant() { 1.0 } else { -1.0 };
        let row: Vec<f64> = (0..7)
            .map(|f| {
                if f < 3 {
                    centre + rng.gen_range(-0.6..0.6)
                } else {
                    rng.gen_range(-0.5..0.5)
                }
            })
            .collect();
        samples.push(row);
        labels.push(label);
    }
    (samples, labels)
}

fn accuracy(model: &dyn Classifier, samples: &[Vec<f64>], labels: &[Label]) -> f64 {
    let correct = samples
        .iter()
        .zip(labels)
        .filter(|(s, l)| model.predict(s).unwrap() == **l)
        .count();
    correct as f64 / samples.len() as f64
}

#[test]
fn uniform_knn_separates_blobs() {
    let (train_x, train_y) = make_blobs(200, 42);
    let (test_x, test_y) = make_blobs(100, 43);
    let model = KNearestNeighbors::new(train_x, train_y, 5, Weighting::Uniform).unwrap();
    let acc = accuracy(&model, &test_x, &test_y);
    assert!(acc > 0.95, "accuracy {acc} <= 0.95");
}

#[test]
fn distance_knn_separates_scaled_blobs() {
    let (train_x, train_y) = make_blobs(200, 42);
    let (test_x, test_y) = make_blobs(100, 44);
    let scaler = StandardScaler::fit(&train_x).unwrap();
    let scale = |rows: &[Vec<f64>]| -> Vec<Vec<f64>> {
        rows.iter().map(|r| scaler.transform(r).unwrap()).collect()
    };
    let model = KNearestNeighbors::new(scale(&train_x), train_y, 7, Weighting::Distance).unwrap();
    let acc = accuracy(&model, &scale(&test_x), &test_y);
    assert!(acc > 0.95, "accuracy {acc} <= 0.95");
}

#[test]
fn probabilities_agree_with_labels() {
    let (train_x, train_y) = make_blobs(120, 5);
    let (test_x, _) = make_blobs(40, 6);
    let model = KNearestNeighbors::new(train_x, train_y, 9, Weighting::Distance).unwrap();
    for sample in &test_x {
        let proba = model.predict_proba(sample).unwrap();
        assert!((proba.benign() + proba.malignant() - 1.0).abs() < 1e-9);
        assert_eq!(proba.predicted_label(), model.predict(sample).unwrap());
    }
}
