//! Classifier port: Trait for the pre-trained prediction model.
//!
//! This trait abstracts the model artifact from the application logic.

use crate::domain::FeatureVector;

/// Errors raised by classifier implementations.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Model artifact could not be read: {0}")]
    Artifact(String),

    #[error("Invalid model format: {0}")]
    Format(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A loaded binary classifier.
///
/// Implementations are immutable once constructed and may be shared across
/// threads behind an `Arc`.
pub trait Classifier: Send + Sync {
    /// Predict one label per input row.
    ///
    /// Labels are returned as the model reports them. Callers are responsible
    /// for checking that they fall in the expected domain.
    ///
    /// # Errors
    /// Returns `ClassifierError::Inference` if the model cannot score the batch.
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>, ClassifierError>;

    /// Content fingerprint of the loaded artifact, if known.
    fn fingerprint(&self) -> Option<&str> {
        None
    }
}
