//! Feature schema for the 28-day mortality model.
//!
//! The table below is the contract with the classifier artifact: its order
//! is the order of the feature vector the model was trained on. Adding,
//! removing or reordering an entry is a breaking change to the model input
//! shape and requires a retrained artifact.

use super::ValidationError;

/// Number of features expected by the classifier.
pub const FEATURE_COUNT: usize = 13;

/// Kind of value a feature accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Whole numbers only (age, scores).
    Integer,
    /// Continuous laboratory values.
    Float,
    /// Exactly 0 or 1.
    Binary,
}

/// Definition of one model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDefinition {
    /// Internal key used by the model artifact.
    pub key: &'static str,
    /// Clinical label shown to the user.
    pub label: &'static str,
    pub value_type: ValueType,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Short unit/range hint for form fields.
    pub hint: &'static str,
}

impl FeatureDefinition {
    /// Check a value against this feature's type and range.
    ///
    /// # Errors
    /// Returns the first constraint the value violates.
    pub fn check(&self, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::Unparsable {
                key: self.key,
                raw: value.to_string(),
            });
        }

        match self.value_type {
            ValueType::Binary => {
                if value != 0.0 && value != 1.0 {
                    return Err(ValidationError::NotBinary {
                        key: self.key,
                        value,
                    });
                }
            }
            ValueType::Integer => {
                if value.fract() != 0.0 {
                    return Err(ValidationError::NotInteger {
                        key: self.key,
                        value,
                    });
                }
            }
            ValueType::Float => {}
        }

        if !(self.min..=self.max).contains(&value) {
            return Err(ValidationError::OutOfRange {
                key: self.key,
                value,
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }

    /// Format a value the way the form and summary table show it.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        match self.value_type {
            ValueType::Integer | ValueType::Binary => format!("{value:.0}"),
            ValueType::Float => format!("{value:.2}"),
        }
    }
}

/// Ordered feature table.
pub static FEATURES: [FeatureDefinition; FEATURE_COUNT] = [
    FeatureDefinition {
        key: "admission_age",
        label: "Age (years)",
        value_type: ValueType::Integer,
        min: 18.0,
        max: 100.0,
        default: 65.0,
        hint: "years (18-100)",
    },
    FeatureDefinition {
        key: "wbc_idx1",
        label: "WBC (10⁹/L)",
        value_type: ValueType::Float,
        min: 0.1,
        max: 50.0,
        default: 10.0,
        hint: "10⁹/L (0.1-50)",
    },
    FeatureDefinition {
        key: "rdw_idx1",
        label: "RDW (%)",
        value_type: ValueType::Float,
        min: 10.0,
        max: 30.0,
        default: 14.0,
        hint: "% (10-30)",
    },
    FeatureDefinition {
        key: "bun_idx1",
        label: "BUN (mg/dL)",
        value_type: ValueType::Float,
        min: 1.0,
        max: 50.0,
        default: 18.0,
        hint: "mg/dL (1-50)",
    },
    FeatureDefinition {
        key: "anion_gap_idx1",
        label: "AG (mEq/L)",
        value_type: ValueType::Float,
        min: 0.0,
        max: 40.0,
        default: 12.0,
        hint: "mEq/L (0-40)",
    },
    FeatureDefinition {
        key: "fbg_idx1",
        label: "FBG (mg/dL)",
        value_type: ValueType::Float,
        min: 40.0,
        max: 500.0,
        default: 100.0,
        hint: "mg/dL (40-500)",
    },
    FeatureDefinition {
        key: "charlson_comorbidity_index",
        label: "CCI (score)",
        value_type: ValueType::Integer,
        min: 0.0,
        max: 20.0,
        default: 2.0,
        hint: "score (0-20)",
    },
    FeatureDefinition {
        key: "sirs_max",
        label: "SIRS Score",
        value_type: ValueType::Integer,
        min: 0.0,
        max: 10.0,
        default: 2.0,
        hint: "score (0-10)",
    },
    FeatureDefinition {
        key: "oasis_avg",
        label: "OASIS Score",
        value_type: ValueType::Integer,
        min: 0.0,
        max: 80.0,
        default: 25.0,
        hint: "score (0-80)",
    },
    FeatureDefinition {
        key: "ventilator_flag",
        label: "Mechanical Ventilation",
        value_type: ValueType::Binary,
        min: 0.0,
        max: 1.0,
        default: 0.0,
        hint: "0=no, 1=yes",
    },
    FeatureDefinition {
        key: "vasoactive",
        label: "Vasoactive Drugs",
        value_type: ValueType::Binary,
        min: 0.0,
        max: 1.0,
        default: 0.0,
        hint: "0=no, 1=yes",
    },
    FeatureDefinition {
        key: "anticoagulants_icu_used",
        label: "Anticoagulants",
        value_type: ValueType::Binary,
        min: 0.0,
        max: 1.0,
        default: 0.0,
        hint: "0=no, 1=yes",
    },
    FeatureDefinition {
        key: "statin_icu_used",
        label: "Statins",
        value_type: ValueType::Binary,
        min: 0.0,
        max: 1.0,
        default: 0.0,
        hint: "0=no, 1=yes",
    },
];

/// Look up a feature definition by internal key.
#[must_use]
pub fn feature(key: &str) -> Option<&'static FeatureDefinition> {
    FEATURES.iter().find(|f| f.key == key)
}

/// Position of a feature in the model vector.
#[must_use]
pub fn position(key: &str) -> Option<usize> {
    FEATURES.iter().position(|f| f.key == key)
}

/// Clinical display label for an internal key.
#[must_use]
pub fn display_label(key: &str) -> Option<&'static str> {
    feature(key).map(|f| f.label)
}

/// Internal keys in model order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    FEATURES.iter().map(|f| f.key)
}
