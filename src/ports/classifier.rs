//! Classifier port: Trait for the pre-trained mortality model.
//!
//! This trait abstracts the model artifact format from the application logic.

/// Errors raised by a classifier while scoring a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Feature count mismatch: got {got}, expected {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Feature order mismatch at position {index}: model has {found:?}, expected {expected:?}")]
    FeatureOrder {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Feature {index} is not a finite number")]
    NonFiniteInput { index: usize },

    #[error("Classifier returned an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// A loaded binary classifier.
///
/// Implementations are read-only after construction, so a single instance
/// can be shared across threads without locking.
pub trait Classifier: Send + Sync {
    /// Number of features the model expects.
    fn n_features(&self) -> usize;

    /// Feature names in the order the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Probability of the positive class (label `1`, mortality).
    ///
    /// # Arguments
    /// * `features` - Feature vector in training order
    ///
    /// # Errors
    /// Returns `ClassifierError::ShapeMismatch` if the vector has the wrong length.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError>;
}
