//! Patient record for the mortality model.
//!
//! A record holds one value per schema feature, stored by position. It can
//! only be built through validating constructors, so a `PatientRecord` in
//! hand always satisfies every feature's type and range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{self, FeatureDefinition, FEATURES, FEATURE_COUNT};

fn label_for(key: &str) -> &str {
    schema::display_label(key).unwrap_or(key)
}

/// Input validation failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required feature: {0}")]
    MissingFeature(&'static str),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Feature given more than once: {0}")]
    DuplicateFeature(String),

    #[error("{}: invalid number {raw:?}", label_for(.key))]
    Unparsable { key: &'static str, raw: String },

    #[error("{}: {value} must be a whole number", label_for(.key))]
    NotInteger { key: &'static str, value: f64 },

    #[error("{}: {value} must be 0 or 1", label_for(.key))]
    NotBinary { key: &'static str, value: f64 },

    #[error("{}: value must be between {min} and {max} (got {value})", label_for(.key))]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Validated patient parameters in model order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct PatientRecord {
    values: [f64; FEATURE_COUNT],
}

impl PatientRecord {
    /// Record with every feature at its schema default.
    #[must_use]
    pub fn defaults() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, def) in values.iter_mut().zip(FEATURES.iter()) {
            *slot = def.default;
        }
        Self { values }
    }

    /// Build a record from values given in schema order.
    ///
    /// # Errors
    /// Returns the first value that violates its feature's constraints.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        let record = Self { values };
        record.validate()?;
        Ok(record)
    }

    /// Build a record from `(internal_key, value)` pairs in any order.
    ///
    /// # Errors
    /// Fails on unknown or repeated keys, on any schema key that is
    /// missing, and on out-of-range values.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];

        for (key, value) in entries {
            let key = key.as_ref();
            let idx = schema::position(key)
                .ok_or_else(|| ValidationError::UnknownFeature(key.to_string()))?;
            if slots[idx].replace(value).is_some() {
                return Err(ValidationError::DuplicateFeature(key.to_string()));
            }
        }

        let mut values = [0.0; FEATURE_COUNT];
        for ((slot, value), def) in slots.iter().zip(values.iter_mut()).zip(FEATURES.iter()) {
            *value = slot.ok_or(ValidationError::MissingFeature(def.key))?;
        }

        Self::from_values(values)
    }

    /// Check every value against the schema.
    ///
    /// # Errors
    /// Returns the first violation in schema order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (def, value) in FEATURES.iter().zip(self.values.iter()) {
            def.check(*value)?;
        }
        Ok(())
    }

    /// Value of a feature by internal key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        schema::position(key).map(|idx| self.values[idx])
    }

    /// Values in model order.
    #[must_use]
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Convert to a vector for the classifier.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    /// Iterate `(definition, value)` pairs in model order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FeatureDefinition, f64)> + '_ {
        FEATURES.iter().zip(self.values.iter().copied())
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self::defaults()
    }
}

impl TryFrom<BTreeMap<String, f64>> for PatientRecord {
    type Error = ValidationError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<PatientRecord> for BTreeMap<String, f64> {
    fn from(record: PatientRecord) -> Self {
        record
            .iter()
            .map(|(def, value)| (def.key.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_entries() -> Vec<(&'static str, f64)> {
        FEATURES.iter().map(|f| (f.key, f.default)).collect()
    }

    #[test]
    fn test_defaults_record() {
        let record = PatientRecord::defaults();
        assert!(record.validate().is_ok());
        assert_eq!(record.get("admission_age"), Some(65.0));
        assert_eq!(record.get("fbg_idx1"), Some(100.0));
        assert_eq!(record.get("statin_icu_used"), Some(0.0));
        assert_eq!(record.to_vec().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_from_entries_any_order() {
        let mut entries = default_entries();
        entries.reverse();
        let record = PatientRecord::from_entries(entries).expect("valid entries");
        assert_eq!(record, PatientRecord::defaults());
    }

    #[test]
    fn test_missing_key_rejected() {
        let entries: Vec<_> = default_entries()
            .into_iter()
            .filter(|(k, _)| *k != "bun_idx1")
            .collect();
        assert_eq!(
            PatientRecord::from_entries(entries),
            Err(ValidationError::MissingFeature("bun_idx1"))
        );
    }

    #[test]
    fn test_unknown_and_duplicate_keys_rejected() {
        let mut entries = default_entries();
        entries.push(("lactate", 2.0));
        assert!(matches!(
            PatientRecord::from_entries(entries),
            Err(ValidationError::UnknownFeature(k)) if k == "lactate"
        ));

        let mut entries = default_entries();
        entries.push(("sirs_max", 3.0));
        assert!(matches!(
            PatientRecord::from_entries(entries),
            Err(ValidationError::DuplicateFeature(k)) if k == "sirs_max"
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut values = *PatientRecord::defaults().values();
        values[5] = 600.0; // fbg_idx1
        let err = PatientRecord::from_values(values).expect_err("out of range");
        assert!(matches!(err, ValidationError::OutOfRange { key: "fbg_idx1", .. }));
        assert!(err.to_string().starts_with("FBG (mg/dL)"));
    }

    #[test]
    fn test_serde_map_shape() {
        let record = PatientRecord::defaults();
        let json = serde_json::to_value(record).expect("serialize");
        assert_eq!(json["oasis_avg"], serde_json::json!(25.0));

        let back: PatientRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, record);

        let bad = serde_json::json!({ "admission_age": 65.0 });
        assert!(serde_json::from_value::<PatientRecord>(bad).is_err());
    }
}
