use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::fields::{feature_names, FEATURE_COUNT};
use crate::data::model::FeatureVector;
use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Classifier seam
// ---------------------------------------------------------------------------

/// A trained binary classifier over the ten dashboard features.
///
/// Both methods take the whole feature matrix and return one entry per row.
/// Label 1 is malignant, 0 benign; probability rows are `[benign, malignant]`.
pub trait Classifier {
    fn predict(&self, features: &[FeatureVector]) -> Vec<u8>;

    fn predict_proba(&self, features: &[FeatureVector]) -> Vec<[f64; 2]>;

    /// Short description for the status bar and logs.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// Per-feature standardisation applied before the linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk layout of a standardised logistic regression.
///
/// ```json
/// {
///   "feature_names": ["radius_mean", ...],
///   "scaler": { "mean": [...], "scale": [...] },
///   "coefficients": [...],
///   "intercept": -0.4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

// ---------------------------------------------------------------------------
// LogisticModel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    mean: FeatureVector,
    scale: FeatureVector,
    coefficients: FeatureVector,
    intercept: f64,
    source: String,
}

impl LogisticModel {
    /// Unscaled model: features enter the linear term as-is.
    pub fn new(coefficients: FeatureVector, intercept: f64) -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
            coefficients,
            intercept,
            source: "in-memory".to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        let mut model = Self::from_json(&text)?;
        model.source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(model)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(text)?;
        Self::from_artifact(artifact)
    }

    /// Check the artifact against the dashboard's feature order and shape.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let expected: Vec<String> = feature_names().into_iter().map(String::from).collect();
        if artifact.feature_names != expected {
            return Err(ModelError::FeatureOrder {
                expected,
                found: artifact.feature_names,
            });
        }

        let coefficients = to_vector("coefficients", artifact.coefficients)?;
        let (mean, scale) = match artifact.scaler {
            Some(scaler) => (
                to_vector("scaler.mean", scaler.mean)?,
                to_vector("scaler.scale", scaler.scale)?,
            ),
            None => ([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]),
        };
        if let Some(idx) = scale.iter().position(|&s| s == 0.0) {
            return Err(ModelError::ZeroScale(idx));
        }
        if !artifact.intercept.is_finite() {
            return Err(ModelError::NonFinite("intercept"));
        }

        Ok(Self {
            mean,
            scale,
            coefficients,
            intercept: artifact.intercept,
            source: "in-memory".to_string(),
        })
    }

    /// Linear term `intercept + Σ coef · (x - mean) / scale`.
    pub fn decision(&self, x: &FeatureVector) -> f64 {
        x.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .zip(&self.coefficients)
            .map(|(((xi, m), s), c)| c * (xi - m) / s)
            .sum::<f64>()
            + self.intercept
    }
}

fn to_vector(name: &'static str, values: Vec<f64>) -> Result<FeatureVector, ModelError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite(name));
    }
    values.try_into().map_err(|v: Vec<f64>| ModelError::Shape {
        name,
        len: v.len(),
        expected: FEATURE_COUNT,
    })
}

/// Logistic function without overflow for large |z|.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &[FeatureVector]) -> Vec<u8> {
        features
            .iter()
            .map(|x| u8::from(self.decision(x) > 0.0))
            .collect()
    }

    fn predict_proba(&self, features: &[FeatureVector]) -> Vec<[f64; 2]> {
        features
            .iter()
            .map(|x| {
                let p = sigmoid(self.decision(x));
                [1.0 - p, p]
            })
            .collect()
    }

    fn describe(&self) -> String {
        format!("logistic regression ({})", self.source)
    }
}
