//! Input collector: turns raw widget values into a validated record.

use crate::domain::{FeatureDefinition, PatientRecord, ValidationError, FEATURES, FEATURE_COUNT};
use crate::ports::InputSource;

/// Parse one raw value for a feature, falling back to its default.
///
/// # Errors
/// Returns error if the text is not a number or violates the feature's
/// constraints. Out-of-range values are rejected, never clamped.
pub fn parse_value(def: &FeatureDefinition, raw: Option<&str>) -> Result<f64, ValidationError> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(def.default),
        Some(text) => text,
    };

    let value: f64 = text.parse().map_err(|_| ValidationError::Unparsable {
        key: def.key,
        raw: text.to_string(),
    })?;
    def.check(value)?;
    Ok(value)
}

/// Collect one value per schema feature from `source`.
///
/// The returned record is fully populated and every value is within its
/// feature's range.
///
/// # Errors
/// Returns the first invalid value in schema order.
pub fn collect<S>(source: &S) -> Result<PatientRecord, ValidationError>
where
    S: InputSource + ?Sized,
{
    let mut values = [0.0; FEATURE_COUNT];
    for (slot, def) in values.iter_mut().zip(FEATURES.iter()) {
        *slot = parse_value(def, source.raw_value(def.key))?;
    }

    let record = PatientRecord::from_values(values)?;
    tracing::debug!("Collected {} features", FEATURE_COUNT);
    Ok(record)
}
