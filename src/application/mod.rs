//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the prediction use case.

mod prediction;

pub use prediction::{invoke, PredictionService};
