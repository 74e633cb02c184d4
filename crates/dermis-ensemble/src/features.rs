//! The seven-element feature vector consumed by the ensemble.

use std::path::Path;

use image::RgbImage;
use tracing::{debug, instrument};

use dermis_geometry::{LesionGeometry, extract_geometry, load_rgb};

use crate::error::EnsembleError;

/// Length of every [`FeatureVector`].
pub const FEATURE_COUNT: usize = 7;

/// Column names in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "diameter",
    "asymmetry",
    "color_variation",
    "border_irregularity",
    "compactness",
];

/// Patient sex as encoded for the classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    /// Encoded as 0. Also the fallback for any unrecognised label.
    Female,
    /// Encoded as 1.
    Male,
}

impl Sex {
    /// Parse a free-text label: `"male"` in any letter case is [`Sex::Male`],
    /// everything else (including empty input) is [`Sex::Female`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Female
        }
    }

    /// Numeric encoding (1 for male, 0 otherwise).
    #[must_use]
    pub fn encoded(self) -> f64 {
        match self {
            Self::Female => 0.0,
            Self::Male => 1.0,
        }
    }
}

/// `[age, sex, diameter, asymmetry, color_variation, border_irregularity, compactness]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values already in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Combine patient metadata with lesion geometry. Age is passed through
    /// unchanged.
    #[must_use]
    pub fn assemble(age: f64, sex: Sex, geometry: &LesionGeometry) -> Self {
        let [diameter, asymmetry, color, border, compactness] = geometry.to_array();
        Self([age, sex.encoded(), diameter, asymmetry, color, border, compactness])
    }

    /// Return the patient age.
    #[must_use]
    pub fn age(&self) -> f64 {
        self.0[0]
    }

    /// Return the encoded sex.
    #[must_use]
    pub fn sex_encoded(&self) -> f64 {
        self.0[1]
    }

    /// Return the five geometry components.
    #[must_use]
    pub fn geometry(&self) -> LesionGeometry {
        LesionGeometry {
            diameter: self.0[2],
            asymmetry: self.0[3],
            color_variation: self.0[4],
            border_irregularity: self.0[5],
            compactness: self.0[6],
        }
    }

    /// Return the values as an array.
    #[must_use]
    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Return the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Build the feature vector for an already decoded image.
#[must_use]
pub fn assemble_features(rgb: &RgbImage, age: f64, sex: &str) -> FeatureVector {
    FeatureVector::assemble(age, Sex::from_label(sex), &extract_geometry(rgb))
}

/// Decode an image file and build its feature vector.
///
/// # Errors
///
/// Returns [`EnsembleError::Image`] if the image cannot be decoded.
#[instrument(skip(sex), fields(path = %path.as_ref().display()))]
pub fn extract_features_for_prediction(
    path: impl AsRef<Path>,
    age: f64,
    sex: &str,
) -> Result<FeatureVector, EnsembleError> {
    let rgb = load_rgb(path)?;
    let features = assemble_features(&rgb, age, sex);
    debug!(features = ?features.as_slice(), "features assembled");
    Ok(features)
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use imageproc::drawing::draw_filled_circle_mut;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn sex_encoding_is_case_insensitive_and_total() {
        for label in ["male", "MALE", "Male", "mAlE"] {
            assert_eq!(Sex::from_label(label), Sex::Male, "{label}");
        }
        for label in ["female", "unknown", "", " male", "males", "m"] {
            assert_eq!(Sex::from_label(label), Sex::Female, "{label:?}");
        }
        assert_eq!(Sex::Male.encoded(), 1.0);
        assert_eq!(Sex::Female.encoded(), 0.0);
    }

    #[test]
    fn assemble_orders_components() {
        let geometry = LesionGeometry {
            diameter: 12.0,
            asymmetry: 1.4,
            color_variation: 30.0,
            border_irregularity: 0.1,
            compactness: 0.7,
        };
        let v = FeatureVector::assemble(54.0, Sex::Male, &geometry);
        assert_eq!(v.to_array(), [54.0, 1.0, 12.0, 1.4, 30.0, 0.1, 0.7]);
        assert_eq!(v.geometry(), geometry);
        assert_eq!(v.age(), 54.0);
        assert_eq!(v.sex_encoded(), 1.0);
    }

    #[test]
    fn age_passes_through_unvalidated() {
        let v = FeatureVector::assemble(-3.0, Sex::Female, &LesionGeometry::ZERO);
        assert_eq!(v.age(), -3.0);
        let v = FeatureVector::assemble(250.0, Sex::Female, &LesionGeometry::ZERO);
        assert_eq!(v.age(), 250.0);
    }

    #[test]
    fn blank_image_yields_zero_geometry_tail() {
        let rgb = RgbImage::from_pixel(50, 50, Rgb([240, 220, 210]));
        let v = assemble_features(&rgb, 40.0, "female");
        assert_eq!(v.to_array(), [40.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn names_match_length() {
        assert_eq!(FEATURE_NAMES.len(), FeatureVector::new([0.0; 7]).as_slice().len());
    }

    #[test]
    fn extraction_from_file() {
        let mut rgb = RgbImage::from_pixel(100, 100, Rgb([235, 210, 200]));
        draw_filled_circle_mut(&mut rgb, (50, 50), 20, Rgb([50, 50, 50]));
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lesion.png");
        rgb.save(&path).unwrap();

        let from_file = extract_features_for_prediction(&path, 61.0, "Male").unwrap();
        assert_eq!(from_file, assemble_features(&rgb, 61.0, "male"));
        assert!(from_file.geometry().diameter > 30.0);
    }

    #[test]
    fn undecodable_file_propagates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = extract_features_for_prediction(&path, 30.0, "female").unwrap_err();
        assert!(matches!(err, EnsembleError::Image { .. }));
    }
}
