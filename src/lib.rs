//! # mortality-risk
//!
//! Terminal calculator for 28-day mortality risk in critically ill patients
//! with SIRS, backed by a pre-trained logistic-regression model.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Feature schema, patient record, prediction result
//! - `ports`: Trait definitions for the classifier and the input widgets
//! - `adapters`: Concrete implementations (JSON logistic model, log sanitizing)
//! - `application`: Input collection and prediction use cases
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{PatientRecord, PredictionResult, RiskBand};

/// Result type for mortality-risk operations
pub type Result<T> = std::result::Result<T, MortalityError>;

/// Main error type for mortality-risk
#[derive(Debug, thiserror::Error)]
pub enum MortalityError {
    #[error("Model could not be loaded: {0}")]
    Startup(#[from] adapters::ModelLoadError),

    #[error("Invalid patient data: {0}")]
    InvalidInput(#[from] domain::ValidationError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] ports::ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
