//! # Heartcheck
//!
//! Heart disease likelihood form backed by a pre-trained binary classifier.
//!
//! This crate provides:
//! - A deterministic encoder from form answers to the 13-feature vector
//! - A prediction invoker over an injected classifier handle
//! - Terminal UI and headless JSON front ends
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Answers, feature vector, prediction outcome
//! - `ports`: The classifier trait
//! - `adapters`: Logistic-regression artifact loader, log sanitization
//! - `application`: The prediction use case
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

use std::path::PathBuf;

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, FeatureVector, Field, PatientAnswers, Prediction, RawAnswers};

/// Result type for Heartcheck operations
pub type Result<T> = std::result::Result<T, HeartcheckError>;

/// Main error type for Heartcheck
#[derive(Debug, thiserror::Error)]
pub enum HeartcheckError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: Field, reason: String },

    #[error("Failed to load classifier from {path:?}: {reason}")]
    ClassifierLoad { path: PathBuf, reason: String },

    #[error("Classifier contract violated: {0}")]
    ClassifierContract(String),

    #[error("Classifier failed: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HeartcheckError {
    /// The offending form field, if this is an input error.
    #[must_use]
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::InvalidInput { field, .. } => Some(*field),
            _ => None,
        }
    }
}
