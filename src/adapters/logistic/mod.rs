//! Logistic regression adapter: Implementation of `Classifier` over a JSON artifact.
//!
//! The training pipeline exports the fitted estimator (and the optional
//! standard scaler in front of it) as plain JSON. This adapter loads that
//! export once, validates it against the 13-feature layout and scores rows
//! in-process.
//!
//! # Artifact format
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model_type": "logistic_regression",
//!   "feature_names": ["age", "sex", "cp", ...],
//!   "coefficients": [...],
//!   "intercept": -0.42,
//!   "scaler_mean": [...],
//!   "scaler_scale": [...],
//!   "classes": [0, 1],
//!   "threshold": 0.5
//! }
//! ```
//!
//! `scaler_mean` / `scaler_scale` are optional but must appear together.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, ClassifierError};
use crate::HeartcheckError;

/// Only artifact layout this build understands.
const SUPPORTED_FORMAT_VERSION: u32 = 1;

const MODEL_TYPE: &str = "logistic_regression";

fn default_classes() -> [i64; 2] {
    [0, 1]
}

fn default_threshold() -> f64 {
    0.5
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub format_version: u32,
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
    /// Labels for the negative and positive side of the decision boundary.
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Validated, ready-to-score parameters.
#[derive(Debug, Clone)]
struct Parameters {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
    classes: [i64; 2],
    threshold: f64,
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn to_feature_array(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ClassifierError> {
    let arr: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        ClassifierError::Format(format!(
            "{name} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        ))
    })?;
    if let Some(i) = arr.iter().position(|v| !v.is_finite()) {
        return Err(ClassifierError::Format(format!(
            "{name}[{i}] is not a finite number"
        )));
    }
    Ok(arr)
}

impl TryFrom<ExportedModel> for Parameters {
    type Error = ClassifierError;

    fn try_from(model: ExportedModel) -> Result<Self, Self::Error> {
        if model.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ClassifierError::Format(format!(
                "Unsupported format_version: {} (expected {SUPPORTED_FORMAT_VERSION})",
                model.format_version
            )));
        }
        if model.model_type != MODEL_TYPE {
            return Err(ClassifierError::Format(format!(
                "Unsupported model_type: {:?} (expected {MODEL_TYPE:?})",
                model.model_type
            )));
        }

        // Column order is part of the contract with the trained weights.
        if model.feature_names.len() != FEATURE_COUNT
            || model
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(got, want)| got != want)
        {
            return Err(ClassifierError::Format(format!(
                "feature_names must be {:?}, got {:?}",
                FEATURE_NAMES, model.feature_names
            )));
        }

        let coefficients = to_feature_array("coefficients", &model.coefficients)?;
        if !model.intercept.is_finite() {
            return Err(ClassifierError::Format("intercept is not finite".into()));
        }

        let (mean, scale) = match (&model.scaler_mean, &model.scaler_scale) {
            (Some(mean), Some(scale)) => {
                let mean = to_feature_array("scaler_mean", mean)?;
                let scale = to_feature_array("scaler_scale", scale)?;
                if let Some(i) = scale.iter().position(|s| *s == 0.0) {
                    return Err(ClassifierError::Format(format!(
                        "scaler_scale[{i}] is zero"
                    )));
                }
                (mean, scale)
            }
            (None, None) => ([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]),
            _ => {
                return Err(ClassifierError::Format(
                    "scaler_mean and scaler_scale must be given together".into(),
                ))
            }
        };

        if !(model.threshold > 0.0 && model.threshold < 1.0) {
            return Err(ClassifierError::Format(format!(
                "threshold {} must lie in (0, 1)",
                model.threshold
            )));
        }

        Ok(Self {
            coefficients,
            intercept: model.intercept,
            mean,
            scale,
            classes: model.classes,
            threshold: model.threshold,
        })
    }
}

/// Logistic regression classifier loaded from a JSON export.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    params: Parameters,
    fingerprint: String,
    source: Option<PathBuf>,
}

impl LogisticModel {
    /// Load and validate a model artifact.
    ///
    /// The file is read as bytes so the fingerprint covers exactly what was
    /// parsed.
    ///
    /// # Errors
    /// Returns `ClassifierLoad` if the file is missing, unreadable or does not
    /// describe a valid 13-feature model.
    pub fn load(path: &Path) -> Result<Self, HeartcheckError> {
        let load_err = |reason: String| HeartcheckError::ClassifierLoad {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| load_err(e.to_string()))?;
        let mut model =
            Self::from_slice(&bytes).map_err(|e| load_err(e.to_string()))?;
        model.source = Some(path.to_path_buf());

        tracing::info!(
            "Loaded model from {:?} (classes={:?}, threshold={}, scaled={}, sha256={})",
            path,
            model.params.classes,
            model.params.threshold,
            model.params.scale != [1.0; FEATURE_COUNT],
            model.fingerprint
        );

        Ok(model)
    }

    /// Parse an artifact already in memory.
    ///
    /// # Errors
    /// Returns `ClassifierError::Format` if the bytes are not a valid export.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let exported: ExportedModel = serde_json::from_slice(bytes)
            .map_err(|e| ClassifierError::Format(e.to_string()))?;
        Ok(Self {
            params: Parameters::try_from(exported)?,
            fingerprint: sha256_hex_bytes(bytes),
            source: None,
        })
    }

    /// Build from an in-memory export.
    ///
    /// # Errors
    /// Returns `ClassifierError::Format` if the parameters are inconsistent.
    pub fn from_exported(exported: ExportedModel) -> Result<Self, ClassifierError> {
        let bytes = serde_json::to_vec(&exported)
            .map_err(|e| ClassifierError::Format(e.to_string()))?;
        Ok(Self {
            params: Parameters::try_from(exported)?,
            fingerprint: sha256_hex_bytes(&bytes),
            source: None,
        })
    }

    /// Path the model was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Probability of the positive class for one row.
    #[must_use]
    pub fn probability(&self, row: &FeatureVector) -> f64 {
        let p = &self.params;
        let z = row
            .as_array()
            .iter()
            .enumerate()
            .fold(p.intercept, |acc, (i, x)| {
                acc + p.coefficients[i] * (x - p.mean[i]) / p.scale[i]
            });
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticModel {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>, ClassifierError> {
        let [negative, positive] = self.params.classes;
        batch
            .iter()
            .map(|row| {
                let p = self.probability(row);
                if p.is_nan() {
                    return Err(ClassifierError::Inference(
                        "decision function produced NaN".into(),
                    ));
                }
                tracing::trace!("Scored row (p={p:.4})");
                Ok(if p >= self.params.threshold {
                    positive
                } else {
                    negative
                })
            })
            .collect()
    }

    fn fingerprint(&self) -> Option<&str> {
        Some(&self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn exported(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> ExportedModel {
        ExportedModel {
            format_version: 1,
            model_type: MODEL_TYPE.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: coefficients.to_vec(),
            intercept,
            scaler_mean: None,
            scaler_scale: None,
            classes: [0, 1],
            threshold: 0.5,
        }
    }

    /// Positive exactly when cholesterol exceeds 100 mg/dl.
    fn cholesterol_model() -> LogisticModel {
        let mut coef = [0.0; FEATURE_COUNT];
        coef[4] = 0.05;
        LogisticModel::from_exported(exported(coef, -5.0)).expect("Valid model")
    }

    fn scenario_a() -> FeatureVector {
        FeatureVector::from_array([
            45.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 1.0,
        ])
    }

    fn write_artifact(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Temp file");
        file.write_all(body.as_bytes()).expect("Write artifact");
        file
    }

    #[test]
    fn test_predict_uses_threshold() {
        let model = cholesterol_model();
        let mut low = *scenario_a().as_array();
        low[4] = 80.0;
        let labels = model
            .predict(&[scenario_a(), FeatureVector::from_array(low)])
            .expect("Should predict");
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_swapping_positions_changes_prediction() {
        let model = cholesterol_model();
        let original = scenario_a();
        let mut swapped = *original.as_array();
        swapped.swap(1, 4);

        let labels = model
            .predict(&[original, FeatureVector::from_array(swapped)])
            .expect("Should predict");
        assert_ne!(labels[0], labels[1]);
    }

    #[test]
    fn test_scaler_is_applied() {
        let mut coef = [0.0; FEATURE_COUNT];
        coef[0] = 1.0;
        let mut export = exported(coef, 0.0);
        let mut mean = vec![0.0; FEATURE_COUNT];
        mean[0] = 50.0;
        export.scaler_mean = Some(mean);
        export.scaler_scale = Some(vec![10.0; FEATURE_COUNT]);
        let model = LogisticModel::from_exported(export).expect("Valid model");

        // age 45 standardizes to -0.5
        let p = model.probability(&scenario_a());
        assert!((p - sigmoid(-0.5)).abs() < 1e-12);
        assert_eq!(model.predict(&[scenario_a()]).expect("Should predict"), vec![0]);
    }

    #[test]
    fn test_custom_classes_are_reported_verbatim() {
        let mut export = exported([0.0; FEATURE_COUNT], 3.0);
        export.classes = [0, 2];
        let model = LogisticModel::from_exported(export).expect("Valid model");
        assert_eq!(model.predict(&[scenario_a()]).expect("Should predict"), vec![2]);
    }

    #[test]
    fn test_empty_batch() {
        let model = cholesterol_model();
        assert!(model.predict(&[]).expect("Should predict").is_empty());
    }

    #[test]
    fn test_rejects_reordered_feature_names() {
        let mut export = exported([0.0; FEATURE_COUNT], 0.0);
        export.feature_names.swap(0, 1);
        assert!(matches!(
            LogisticModel::from_exported(export),
            Err(ClassifierError::Format(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        let mut export = exported([0.0; FEATURE_COUNT], 0.0);
        export.coefficients.pop();
        assert!(LogisticModel::from_exported(export).is_err());
    }

    #[test]
    fn test_rejects_half_scaler_and_zero_scale() {
        let mut export = exported([0.0; FEATURE_COUNT], 0.0);
        export.scaler_mean = Some(vec![0.0; FEATURE_COUNT]);
        assert!(LogisticModel::from_exported(export.clone()).is_err());

        export.scaler_scale = Some(vec![0.0; FEATURE_COUNT]);
        assert!(LogisticModel::from_exported(export).is_err());
    }

    #[test]
    fn test_rejects_bad_threshold_and_version() {
        let mut export = exported([0.0; FEATURE_COUNT], 0.0);
        export.threshold = 1.0;
        assert!(LogisticModel::from_exported(export).is_err());

        let mut export = exported([0.0; FEATURE_COUNT], 0.0);
        export.format_version = 2;
        assert!(LogisticModel::from_exported(export).is_err());
    }

    #[test]
    fn test_load_missing_file_fails_immediately() {
        let dir = tempfile::tempdir().expect("Temp dir");
        let path = dir.path().join("heart_disease_model.json");
        let err = LogisticModel::load(&path).expect_err("Should fail");
        assert!(matches!(err, HeartcheckError::ClassifierLoad { .. }));
    }

    #[test]
    fn test_load_garbage_fails() {
        let file = write_artifact("\u{80}\u{3}pickle-bytes");
        let err = LogisticModel::load(file.path()).expect_err("Should fail");
        assert!(matches!(err, HeartcheckError::ClassifierLoad { .. }));
    }

    #[test]
    fn test_load_from_file_records_fingerprint() {
        let body = serde_json::to_string(&exported([0.0; FEATURE_COUNT], 1.0))
            .expect("Serialize export");
        let file = write_artifact(&body);

        let model = LogisticModel::load(file.path()).expect("Should load");
        assert_eq!(model.source(), Some(file.path()));
        assert_eq!(
            model.fingerprint(),
            Some(sha256_hex_bytes(body.as_bytes()).as_str())
        );
        assert_eq!(model.fingerprint().map(str::len), Some(64));
    }

    #[test]
    fn test_bundled_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("model")
            .join("heart_disease_model.json");
        let model = LogisticModel::load(&path).expect("Bundled model should load");
        let labels = model.predict(&[scenario_a()]).expect("Should predict");
        assert!(labels[0] == 0 || labels[0] == 1);
    }
}
