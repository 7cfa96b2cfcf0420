//! Domain layer: Core types and logic.
//!
//! This module holds the form answers, the feature encoder and the prediction
//! outcome. Nothing here performs I/O.

mod answers;
mod features;
mod outcome;

pub use answers::{
    Choice, ChestPainType, Field, MajorVessels, PatientAnswers, RawAnswers, RawValue, RestingEcg,
    Sex, StSlope, Thalassemia, YesNo, AGE_RANGE,
};
pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use outcome::{Assessment, Prediction};
