//! Manifest CSV -> records -> JSON results -> deserialize.

use std::fs;

use dermis_io::{
    CaseOutcome, ExperimentName, FeatureRecord, IoError, ManifestReader, PredictionRecord, ResultWriter,
};
use tempfile::TempDir;

const MANIFEST: &str = "\
case_id,image_path,age,sex
ISIC_001,images/001.png,63,male
ISIC_002,images/002.png,41,FEMALE
ISIC_003,images/003.png,18.5,
";

#[test]
fn manifest_to_prediction_json() {
    let dir = TempDir::new().unwrap();
    let manifest_path = dir.path().join("cases.csv");
    fs::write(&manifest_path, MANIFEST).unwrap();

    let manifest = ManifestReader::new(&manifest_path).read().unwrap();
    assert_eq!(manifest.len(), 3);
    assert!(manifest.cases()[2].image_path().ends_with("images/003.png"));

    let records: Vec<PredictionRecord> = manifest
        .cases()
        .iter()
        .map(|case| PredictionRecord {
            case_id: case.case_id().clone(),
            outcome: if case.age() > 50.0 {
                CaseOutcome::Predicted {
                    label: "MALIGNANT".to_string(),
                    model_a: "MALIGNANT".to_string(),
                    model_b: "MALIGNANT".to_string(),
                    reason: "Both models agree.".to_string(),
                    arbitration_value: 1.25,
                    probabilities: None,
                }
            } else {
                CaseOutcome::Failed {
                    error: format!("failed to read {}", case.image_path().display()),
                }
            },
        })
        .collect();

    let out_dir = dir.path().join("out");
    let writer = ResultWriter::new(&out_dir, ExperimentName::new("clinic".into()).unwrap()).unwrap();
    let path = writer.write_predictions(&records).unwrap();

    let content: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["experiment"], "clinic");
    assert_eq!(content["n_cases"], 3);
    assert_eq!(content["n_failed"], 2);

    let cases = content["cases"].as_array().unwrap();
    let ids: Vec<&str> = cases.iter().map(|c| c["case_id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["ISIC_001", "ISIC_002", "ISIC_003"]);
    assert_eq!(cases[0]["reason"], "Both models agree.");
    assert_eq!(cases[1]["status"], "failed");
}

#[test]
fn manifest_to_features_json() {
    let dir = TempDir::new().unwrap();
    let manifest_path = dir.path().join("cases.csv");
    fs::write(&manifest_path, MANIFEST).unwrap();
    let manifest = ManifestReader::new(&manifest_path).read().unwrap();

    let records: Vec<FeatureRecord> = manifest
        .cases()
        .iter()
        .map(|case| FeatureRecord {
            case_id: case.case_id().clone(),
            values: vec![case.age(), 0.0],
        })
        .collect();

    let writer = ResultWriter::new(dir.path(), ExperimentName::new("feat".into()).unwrap()).unwrap();
    let path = writer.write_features(&["age", "sex"], &records).unwrap();

    let content: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["cases"][2]["values"][0], 18.5);
    assert_eq!(content["feature_names"].as_array().unwrap().len(), 2);
}

#[test]
fn writer_rejects_unsafe_experiment_name() {
    let err = ExperimentName::new("../../etc".into()).unwrap_err();
    assert!(matches!(err, IoError::InvalidExperimentName { .. }));
}
