//! Domain layer: feature schema, patient records and prediction results.
//!
//! Pure types with no I/O. Everything here is deterministic.

mod patient;
mod prediction;
pub mod schema;

pub use patient::{PatientRecord, ValidationError};
pub use prediction::{format_percent, PredictionResult, RiskBand, RiskDisplay, HIGH_RISK_THRESHOLD};
pub use schema::{FeatureDefinition, ValueType, FEATURES, FEATURE_COUNT};
