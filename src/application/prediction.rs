//! Prediction service: Encodes answers and invokes the classifier.
//!
//! Each submission is an independent transaction:
//! 1. Validate answers (rejecting before any model call)
//! 2. Encode the feature vector
//! 3. Score a batch of one
//! 4. Map the label to a verdict

use std::sync::Arc;

use crate::domain::{encode, Assessment, FeatureVector, PatientAnswers, Prediction, RawAnswers};
use crate::ports::Classifier;
use crate::HeartcheckError;

/// Submit one feature vector and interpret the single returned label.
///
/// # Errors
/// Returns `Classifier` if the model fails, or `ClassifierContract` if it
/// answers with anything other than exactly one label in {0, 1}.
pub fn invoke<C>(classifier: &C, features: &FeatureVector) -> Result<Prediction, HeartcheckError>
where
    C: Classifier + ?Sized,
{
    let labels = classifier.predict(std::slice::from_ref(features))?;

    let label = match labels.as_slice() {
        [label] => *label,
        other => {
            return Err(HeartcheckError::ClassifierContract(format!(
                "expected 1 label for a batch of 1, got {}",
                other.len()
            )))
        }
    };

    Prediction::from_label(label)
}

/// Service for running predictions against a loaded classifier.
///
/// The classifier is loaded once at startup and injected here; the service
/// itself keeps no state between submissions.
pub struct PredictionService<C>
where
    C: Classifier + ?Sized,
{
    classifier: Arc<C>,
}

impl<C> Clone for PredictionService<C>
where
    C: Classifier + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<C> PredictionService<C>
where
    C: Classifier + ?Sized,
{
    /// Create a new prediction service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Fingerprint of the underlying model, if it reports one.
    #[must_use]
    pub fn model_fingerprint(&self) -> Option<&str> {
        self.classifier.fingerprint()
    }

    /// Assess validated answers.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a numeric answer is out of domain, otherwise
    /// any error from [`invoke`].
    pub fn assess(&self, answers: &PatientAnswers) -> Result<Assessment, HeartcheckError> {
        answers.validate()?;
        let features = encode(answers);

        let prediction = invoke(self.classifier.as_ref(), &features).map_err(|e| {
            tracing::error!("Prediction failed: {e}");
            e
        })?;

        tracing::info!("Prediction complete: outcome={prediction}");
        Ok(Assessment::new(prediction))
    }

    /// Parse, validate and assess untyped answers.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the first bad field; the classifier is
    /// not called in that case.
    pub fn assess_raw(&self, raw: &RawAnswers) -> Result<Assessment, HeartcheckError> {
        let answers = PatientAnswers::from_raw(raw).map_err(|e| {
            if let Some(field) = e.field() {
                tracing::warn!("Rejected submission: invalid {}", field.key());
            }
            e
        })?;
        self.assess(&answers)
    }
}
