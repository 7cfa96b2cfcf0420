//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external artifacts:
//! - `logistic`: JSON logistic-regression model export
//! - `sanitize`: clinical value filtering for logs

pub mod logistic;
pub mod sanitize;

pub use logistic::{ExportedModel, LogisticModel};
