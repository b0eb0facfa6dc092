//! Logistic-regression adapter: Implementation of `Classifier` backed by a
//! JSON model artifact.
//!
//! The artifact is an export of a fitted binary logistic regression,
//! optionally preceded by a standard scaler:
//!
//! ```json
//! {
//!   "model_type": "logistic_regression",
//!   "feature_names": ["admission_age", "wbc_idx1", "..."],
//!   "classes": [0, 1],
//!   "coefficients": [0.42, 0.18, "..."],
//!   "intercept": -1.55,
//!   "scaler": { "mean": ["..."], "scale": ["..."] },
//!   "description": "where the weights came from"
//! }
//! ```
//!
//! The model is loaded once at startup and never mutated afterwards.
//! `feature_names` must list the schema keys in schema order; anything else
//! is refused at load time so a retrained artifact with a different layout
//! cannot silently receive misaligned vectors.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FEATURES, FEATURE_COUNT};
use crate::ports::{Classifier, ClassifierError};

/// File name looked up when the configured model path is a directory.
pub const DEFAULT_MODEL_FILE: &str = "logit_model.json";

const SUPPORTED_MODEL_TYPE: &str = "logistic_regression";

/// Label of the positive (mortality) class.
const POSITIVE_CLASS: i64 = 1;

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model artifact not found at {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported model type: {0}")]
    UnsupportedType(String),

    #[error(
        "Feature order mismatch at position {index}: artifact has {found:?}, expected {expected:?}"
    )]
    FeatureOrder {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// Standard-scaler parameters exported alongside the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Model parameters as stored in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLogitModel {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub feature_names: Vec<String>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<ExportedScaler>,
    /// Provenance of the weights, shown next to the fingerprint.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_model_type() -> String {
    SUPPORTED_MODEL_TYPE.to_string()
}

fn default_classes() -> Vec<i64> {
    vec![0, POSITIVE_CLASS]
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Resolve the configured model path to an artifact file.
///
/// A directory resolves to `DEFAULT_MODEL_FILE` inside it.
#[must_use]
pub fn resolve_artifact_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_MODEL_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Loaded logistic-regression classifier.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    params: ExportedLogitModel,
    /// Index of the positive class within `classes` (0 or 1).
    positive_index: usize,
    fingerprint: String,
    source: Option<PathBuf>,
}

impl LogisticModel {
    /// Load and verify a model artifact.
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable, malformed, or does
    /// not match the feature schema.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let artifact = resolve_artifact_path(path);
        if !artifact.exists() {
            return Err(ModelLoadError::NotFound(artifact));
        }

        let bytes = fs::read(&artifact).map_err(|source| ModelLoadError::Io {
            path: artifact.clone(),
            source,
        })?;
        let params: ExportedLogitModel = serde_json::from_slice(&bytes)?;

        let mut model = Self::from_exported(params, sha256_hex(&bytes))?;

        tracing::info!(
            "Loaded model from {:?} (n_features={}, sha256={})",
            artifact,
            model.n_features(),
            model.fingerprint
        );
        match model.description() {
            Some(description) => tracing::info!("Model provenance: {}", description),
            None => tracing::warn!("Model artifact carries no provenance description"),
        }

        model.source = Some(artifact);
        Ok(model)
    }

    /// Build a model from already-parsed parameters.
    ///
    /// # Errors
    /// Returns error if the parameters are inconsistent or do not match the
    /// feature schema.
    pub fn from_exported(
        params: ExportedLogitModel,
        fingerprint: impl Into<String>,
    ) -> Result<Self, ModelLoadError> {
        if params.model_type != SUPPORTED_MODEL_TYPE {
            return Err(ModelLoadError::UnsupportedType(params.model_type));
        }

        let n = params.feature_names.len();
        if n != FEATURE_COUNT {
            return Err(ModelLoadError::Invalid(format!(
                "Invalid feature count in model: got {n}, expected {FEATURE_COUNT}"
            )));
        }
        for (index, (found, def)) in params.feature_names.iter().zip(FEATURES.iter()).enumerate() {
            if found != def.key {
                return Err(ModelLoadError::FeatureOrder {
                    index,
                    expected: def.key,
                    found: found.clone(),
                });
            }
        }

        if params.coefficients.len() != n {
            return Err(ModelLoadError::Invalid(
                "Coefficient count does not match feature_names length".into(),
            ));
        }
        if !params.intercept.is_finite() || params.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelLoadError::Invalid(
                "Coefficients and intercept must be finite".into(),
            ));
        }

        if let Some(scaler) = &params.scaler {
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(ModelLoadError::Invalid(
                    "Scaler parameter lengths do not match feature_names length".into(),
                ));
            }
            if scaler.mean.iter().any(|m| !m.is_finite())
                || scaler.scale.iter().any(|s| !s.is_finite() || *s <= 0.0)
            {
                return Err(ModelLoadError::Invalid(
                    "Scaler mean must be finite and scale must be > 0".into(),
                ));
            }
        }

        if params.classes.len() != 2 {
            return Err(ModelLoadError::Invalid(format!(
                "Expected a binary classifier, got {} classes",
                params.classes.len()
            )));
        }
        let positive_index = params
            .classes
            .iter()
            .position(|&c| c == POSITIVE_CLASS)
            .ok_or_else(|| {
                ModelLoadError::Invalid(format!(
                    "Positive class {POSITIVE_CLASS} missing from classes {:?}",
                    params.classes
                ))
            })?;

        Ok(Self {
            params,
            positive_index,
            fingerprint: fingerprint.into(),
            source: None,
        })
    }

    /// SHA-256 of the artifact bytes (hex).
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Provenance text from the artifact, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.params.description.as_deref()
    }

    /// Path the model was loaded from, if it came from disk.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Linear decision value for `classes[1]`.
    fn decision_function(&self, features: &[f64]) -> f64 {
        let params = &self.params;
        let mut z = params.intercept;
        for (i, (&x, &coef)) in features.iter().zip(params.coefficients.iter()).enumerate() {
            let x = match &params.scaler {
                Some(scaler) => (x - scaler.mean[i]) / scaler.scale[i],
                None => x,
            };
            z += coef * x;
        }
        z
    }
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.params.feature_names.len()
    }

    fn feature_names(&self) -> &[String] {
        &self.params.feature_names
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ClassifierError::ShapeMismatch {
                expected,
                got: features.len(),
            });
        }
        if let Some(index) = features.iter().position(|x| !x.is_finite()) {
            return Err(ClassifierError::NonFiniteInput { index });
        }

        let z = self.decision_function(features);
        // The decision value scores classes[1]; flip it when label 1 comes first.
        let p = if self.positive_index == 1 {
            sigmoid(z)
        } else {
            sigmoid(-z)
        };

        if !(0.0..=1.0).contains(&p) {
            return Err(ClassifierError::InvalidProbability(p));
        }
        Ok(p)
    }
}
