//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (the trained model).

mod classifier;

pub use classifier::{Classifier, ClassifierError};
