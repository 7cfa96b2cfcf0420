//! Prediction outcome types.
//!
//! Represents the verdict handed back to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::HeartcheckError;

/// Two-valued classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    /// Label 1: likely to have heart disease
    Positive,
    /// Label 0: no heart disease indicated
    Negative,
}

impl Prediction {
    /// Interpret a classifier label.
    ///
    /// # Errors
    /// Returns `ClassifierContract` for any label other than 0 or 1.
    pub fn from_label(label: i64) -> Result<Self, HeartcheckError> {
        match label {
            1 => Ok(Self::Positive),
            0 => Ok(Self::Negative),
            other => Err(HeartcheckError::ClassifierContract(format!(
                "label {other} is outside {{0, 1}}"
            ))),
        }
    }

    #[must_use]
    pub fn label(&self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Negative => 0,
        }
    }

    /// Result sentence shown to the user.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Positive => "The person is likely to have heart disease.",
            Self::Negative => "The person does NOT have heart disease.",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Positive => (244, 63, 94),  // Rose (#F43F5E)
            Self::Negative => (16, 185, 129), // Emerald (#10B981)
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// A single completed assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub prediction: Prediction,

    /// Raw label returned by the classifier
    pub label: i64,

    /// Timestamp of the prediction
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(prediction: Prediction) -> Self {
        Self {
            prediction,
            label: prediction.label(),
            assessed_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_map_to_outcomes() {
        assert_eq!(Prediction::from_label(1).unwrap(), Prediction::Positive);
        assert_eq!(Prediction::from_label(0).unwrap(), Prediction::Negative);
    }

    #[test]
    fn test_out_of_contract_labels_rejected() {
        for label in [-1, 2, 7, i64::MAX] {
            let err = Prediction::from_label(label).expect_err("Should reject");
            assert!(matches!(err, HeartcheckError::ClassifierContract(_)));
        }
    }

    #[test]
    fn test_assessment_records_label() {
        let a = Assessment::new(Prediction::Positive);
        assert_eq!(a.label, 1);
        let json = serde_json::to_value(&a).expect("Should serialize");
        assert_eq!(json["prediction"], "positive");
    }
}
