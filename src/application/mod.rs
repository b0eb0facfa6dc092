//! Application layer: Use cases and services.
//!
//! Collects form input into records and scores them with the classifier.

pub mod collector;
mod prediction;

pub use collector::collect;
pub use prediction::PredictionService;
