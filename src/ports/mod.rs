//! Ports layer: Trait definitions for external operations.
//!
//! These traits define the boundaries between the application and the
//! model artifact and the input widgets.

mod classifier;
mod input;

pub use classifier::{Classifier, ClassifierError};
pub use input::InputSource;
