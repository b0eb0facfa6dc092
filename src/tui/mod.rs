//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single page with:
//! - Sidebar form of patient parameters
//! - Input summary under clinical labels
//! - Predict action with risk metric, bar and progress line

mod app;
mod styles;
mod ui;

pub use app::{model_path_from_env, App};
pub use styles::MedicalTheme;
