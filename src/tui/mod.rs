//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Patient data input
//! - Prediction results
//! - Feature descriptions and model details

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use ui::about::AboutState;
