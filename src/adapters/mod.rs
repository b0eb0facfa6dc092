//! Adapters layer: Concrete implementations of ports.
//!
//! - `logit`: logistic-regression classifier loaded from a JSON artifact
//! - `sanitize`: clinical value filtering for logs

pub mod logit;
pub mod sanitize;

// Re-export load error for lib.rs
pub use logit::ModelLoadError;
