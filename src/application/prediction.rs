//! Prediction service: scores patient records with the loaded classifier.

use std::sync::Arc;

use crate::domain::{schema, PatientRecord, PredictionResult, FEATURE_COUNT};
use crate::ports::{Classifier, ClassifierError};
use crate::MortalityError;

/// Service for running mortality predictions.
///
/// The classifier is loaded once at startup and shared read-only; the
/// service never mutates or reloads it.
pub struct PredictionService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
}

impl<C> Clone for PredictionService<C>
where
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a new prediction service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// The underlying classifier.
    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Check the classifier's input layout against the feature schema.
    fn check_layout(&self) -> Result<(), ClassifierError> {
        let expected = self.classifier.n_features();
        let names = self.classifier.feature_names();
        if expected != FEATURE_COUNT || names.len() != FEATURE_COUNT {
            return Err(ClassifierError::ShapeMismatch {
                expected,
                got: FEATURE_COUNT,
            });
        }

        for (index, (found, key)) in names.iter().zip(schema::keys()).enumerate() {
            if found != key {
                return Err(ClassifierError::FeatureOrder {
                    index,
                    expected: key,
                    found: found.clone(),
                });
            }
        }
        Ok(())
    }

    /// Probability of 28-day mortality for a record.
    ///
    /// The record is re-validated before the classifier is called, so the
    /// range contract holds whatever front end built it. A classifier whose
    /// feature layout differs from the schema is never invoked.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an invalid record and `Prediction` if the
    /// classifier fails or returns something that is not a probability.
    pub fn predict(&self, record: &PatientRecord) -> Result<f64, MortalityError> {
        record.validate()?;
        self.check_layout()?;

        let probability = self.classifier.predict_proba(&record.to_vec())?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ClassifierError::InvalidProbability(probability).into());
        }

        Ok(probability)
    }

    /// Score a record given as `(internal_key, value)` pairs.
    ///
    /// # Errors
    /// A missing, unknown or out-of-range key fails with `InvalidInput`
    /// before the classifier is invoked.
    pub fn predict_entries<I, K>(&self, entries: I) -> Result<f64, MortalityError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let record = PatientRecord::from_entries(entries)?;
        self.predict(&record)
    }

    /// Score a record and wrap the probability in a result.
    ///
    /// # Errors
    /// Same as [`PredictionService::predict`].
    pub fn score(&self, record: &PatientRecord) -> Result<PredictionResult, MortalityError> {
        let result = PredictionResult::new(self.predict(record)?);
        tracing::info!("Prediction complete: band={}", result.risk_band());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::logit::{ExportedLogitModel, ExportedScaler, LogisticModel};
    use crate::domain::{RiskBand, ValidationError, FEATURES};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Classifier that counts calls and returns a fixed value.
    struct CountingClassifier {
        names: Vec<String>,
        calls: AtomicUsize,
        output: f64,
    }

    impl CountingClassifier {
        fn returning(output: f64) -> Self {
            Self {
                names: FEATURES.iter().map(|f| f.key.to_string()).collect(),
                calls: AtomicUsize::new(0),
                output,
            }
        }

        fn with_names(mut self, names: Vec<String>) -> Self {
            self.names = names;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Classifier for CountingClassifier {
        fn n_features(&self) -> usize {
            self.names.len()
        }

        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if features.len() != self.names.len() {
                return Err(ClassifierError::ShapeMismatch {
                    expected: self.names.len(),
                    got: features.len(),
                });
            }
            Ok(self.output)
        }
    }

    fn logistic_service() -> PredictionService<LogisticModel> {
        let params = ExportedLogitModel {
            model_type: "logistic_regression".into(),
            feature_names: FEATURES.iter().map(|f| f.key.to_string()).collect(),
            classes: vec![0, 1],
            coefficients: vec![0.4, 0.2, 0.3, 0.3, 0.1, 0.1, 0.2, 0.1, 0.5, 0.2, 0.2, -0.2, -0.2],
            intercept: -1.5,
            scaler: Some(ExportedScaler {
                mean: FEATURES.iter().map(|f| f.default).collect(),
                scale: vec![2.0; FEATURES.len()],
            }),
            description: None,
        };
        let model = LogisticModel::from_exported(params, "test").expect("valid model");
        PredictionService::new(Arc::new(model))
    }

    #[test]
    fn test_missing_key_does_not_invoke_classifier() {
        let classifier = Arc::new(CountingClassifier::returning(0.3));
        let service = PredictionService::new(classifier.clone());

        let entries = FEATURES
            .iter()
            .filter(|f| f.key != "oasis_avg")
            .map(|f| (f.key, f.default));

        let err = service.predict_entries(entries).expect_err("missing key");
        assert!(matches!(
            err,
            MortalityError::InvalidInput(ValidationError::MissingFeature("oasis_avg"))
        ));
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn test_out_of_range_entry_does_not_invoke_classifier() {
        let classifier = Arc::new(CountingClassifier::returning(0.3));
        let service = PredictionService::new(classifier.clone());

        let entries = FEATURES.iter().map(|f| {
            let value = if f.key == "admission_age" { 120.0 } else { f.default };
            (f.key, value)
        });

        assert!(matches!(
            service.predict_entries(entries),
            Err(MortalityError::InvalidInput(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn test_valid_record_in_unit_interval() {
        let service = logistic_service();
        let p = service.predict(&PatientRecord::defaults()).expect("predict");
        assert!((0.0..=1.0).contains(&p));

        let mut values = *PatientRecord::defaults().values();
        values[0] = 100.0;
        values[8] = 80.0;
        values[9] = 1.0;
        let record = PatientRecord::from_values(values).expect("valid");
        let high = service.predict(&record).expect("predict");
        assert!((0.0..=1.0).contains(&high));
        assert!(high > p);
    }

    #[test]
    fn test_defaults_are_bit_identical_across_runs() {
        let service = logistic_service();
        let record = PatientRecord::from_entries(FEATURES.iter().map(|f| (f.key, f.default)))
            .expect("defaults");

        let first = service.predict(&record).expect("predict");
        let second = service.predict(&record).expect("predict");
        let fresh = logistic_service().predict(&record).expect("predict");

        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(first.to_bits(), fresh.to_bits());
    }

    #[test]
    fn test_resubmission_gives_same_display() {
        let service = logistic_service();
        let record = PatientRecord::defaults();
        let a = service.score(&record).expect("score").display();
        let b = service.score(&record).expect("score").display();
        assert_eq!(a.percent, b.percent);
        assert_eq!(a.band, b.band);
    }

    #[test]
    fn test_invalid_probability_is_prediction_error() {
        let service = PredictionService::new(Arc::new(CountingClassifier::returning(1.5)));
        assert!(matches!(
            service.predict(&PatientRecord::defaults()),
            Err(MortalityError::Prediction(ClassifierError::InvalidProbability(_)))
        ));

        let service = PredictionService::new(Arc::new(CountingClassifier::returning(f64::NAN)));
        assert!(matches!(
            service.predict(&PatientRecord::defaults()),
            Err(MortalityError::Prediction(_))
        ));
    }

    #[test]
    fn test_reordered_classifier_is_not_invoked() {
        let mut names: Vec<String> = FEATURES.iter().map(|f| f.key.to_string()).collect();
        names.swap(3, 4);
        let classifier = Arc::new(CountingClassifier::returning(0.3).with_names(names));
        let service = PredictionService::new(classifier.clone());

        let err = service
            .predict(&PatientRecord::defaults())
            .expect_err("reordered layout");
        assert!(matches!(
            err,
            MortalityError::Prediction(ClassifierError::FeatureOrder {
                index: 3,
                expected: "bun_idx1",
                ..
            })
        ));
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn test_short_classifier_is_not_invoked() {
        let names = FEATURES.iter().take(12).map(|f| f.key.to_string()).collect();
        let classifier = Arc::new(CountingClassifier::returning(0.3).with_names(names));
        let service = PredictionService::new(classifier.clone());

        assert!(matches!(
            service.predict(&PatientRecord::defaults()),
            Err(MortalityError::Prediction(ClassifierError::ShapeMismatch { .. }))
        ));
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn test_score_band() {
        let service = PredictionService::new(Arc::new(CountingClassifier::returning(0.41)));
        let result = service.score(&PatientRecord::defaults()).expect("score");
        assert_eq!(result.risk_band(), RiskBand::High);

        let service = PredictionService::new(Arc::new(CountingClassifier::returning(0.40)));
        let result = service.score(&PatientRecord::defaults()).expect("score");
        assert_eq!(result.risk_band(), RiskBand::Low);
    }
}
