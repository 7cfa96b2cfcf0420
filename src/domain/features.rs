//! Feature encoding for the heart disease classifier.
//!
//! The classifier was trained against a fixed 13-column layout. Position
//! defines meaning, so the vector is a fixed-size array and is never reordered.

use serde::{Deserialize, Serialize};

use super::answers::{
    ChestPainType, PatientAnswers, RestingEcg, Sex, StSlope, Thalassemia, YesNo,
};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Encoded patient features in classifier order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap an already-encoded row.
    #[must_use]
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Value at a position, by feature name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }
}

/// Encode validated answers into the classifier's feature vector.
///
/// Binary answers use a fixed convention (male, yes = 1). Multi-valued answers
/// use their zero-based option index, except thalassemia which the model
/// expects one-based (1-3).
#[must_use]
pub fn encode(answers: &PatientAnswers) -> FeatureVector {
    FeatureVector([
        f64::from(answers.age),
        sex_code(answers.sex),
        chest_pain_code(answers.chest_pain),
        answers.resting_bp,
        answers.cholesterol,
        yes_no_code(answers.fasting_blood_sugar),
        resting_ecg_code(answers.resting_ecg),
        answers.max_heart_rate,
        yes_no_code(answers.exercise_angina),
        answers.oldpeak,
        slope_code(answers.slope),
        f64::from(answers.major_vessels.count()),
        thal_code(answers.thalassemia),
    ])
}

fn sex_code(sex: Sex) -> f64 {
    match sex {
        Sex::Male => 1.0,
        Sex::Female => 0.0,
    }
}

fn yes_no_code(answer: YesNo) -> f64 {
    match answer {
        YesNo::Yes => 1.0,
        YesNo::No => 0.0,
    }
}

fn chest_pain_code(cp: ChestPainType) -> f64 {
    match cp {
        ChestPainType::TypicalAngina => 0.0,
        ChestPainType::AtypicalAngina => 1.0,
        ChestPainType::NonAnginalPain => 2.0,
        ChestPainType::Asymptomatic => 3.0,
    }
}

fn resting_ecg_code(ecg: RestingEcg) -> f64 {
    match ecg {
        RestingEcg::Normal => 0.0,
        RestingEcg::StTAbnormality => 1.0,
        RestingEcg::LeftVentricularHypertrophy => 2.0,
    }
}

fn slope_code(slope: StSlope) -> f64 {
    match slope {
        StSlope::Upsloping => 0.0,
        StSlope::Flat => 1.0,
        StSlope::Downsloping => 2.0,
    }
}

// One-based: the training data codes thal as 1-3.
fn thal_code(thal: Thalassemia) -> f64 {
    match thal {
        Thalassemia::Normal => 1.0,
        Thalassemia::FixedDefect => 2.0,
        Thalassemia::ReversibleDefect => 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::answers::{Choice, MajorVessels};

    fn scenario_a() -> PatientAnswers {
        PatientAnswers {
            age: 45,
            sex: Sex::Male,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 120.0,
            cholesterol: 200.0,
            fasting_blood_sugar: YesNo::No,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150.0,
            exercise_angina: YesNo::No,
            oldpeak: 1.0,
            slope: StSlope::Upsloping,
            major_vessels: MajorVessels::Zero,
            thalassemia: Thalassemia::Normal,
        }
    }

    #[test]
    fn test_scenario_a_vector() {
        let v = encode(&scenario_a());
        assert_eq!(
            v.as_array(),
            &[45.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_reversible_defect_is_three() {
        let answers = PatientAnswers {
            thalassemia: Thalassemia::ReversibleDefect,
            ..scenario_a()
        };
        assert_eq!(encode(&answers).get("thal"), Some(3.0));
    }

    #[test]
    fn test_thal_codes_are_one_based() {
        for (i, thal) in Thalassemia::ALL.iter().enumerate() {
            let answers = PatientAnswers {
                thalassemia: *thal,
                ..scenario_a()
            };
            let code = encode(&answers).as_array()[12];
            assert_eq!(code, (i + 1) as f64);
            assert_ne!(code, 0.0);
        }
    }

    #[test]
    fn test_chest_pain_codes_follow_option_order() {
        let labels = [
            "Typical Angina",
            "Atypical Angina",
            "Non-anginal Pain",
            "Asymptomatic",
        ];
        for (i, label) in labels.iter().enumerate() {
            let cp = ChestPainType::from_label(label).expect("Known label");
            let answers = PatientAnswers {
                chest_pain: cp,
                ..scenario_a()
            };
            assert_eq!(encode(&answers).as_array()[2], i as f64);
        }
    }

    #[test]
    fn test_binary_fields_every_combination() {
        for sex in Sex::ALL {
            for fbs in YesNo::ALL {
                for exang in YesNo::ALL {
                    let answers = PatientAnswers {
                        sex: *sex,
                        fasting_blood_sugar: *fbs,
                        exercise_angina: *exang,
                        ..scenario_a()
                    };
                    let v = encode(&answers);
                    let expect = |yes: bool| if yes { 1.0 } else { 0.0 };
                    assert_eq!(v.get("sex"), Some(expect(*sex == Sex::Male)));
                    assert_eq!(v.get("fbs"), Some(expect(*fbs == YesNo::Yes)));
                    assert_eq!(v.get("exang"), Some(expect(*exang == YesNo::Yes)));
                }
            }
        }
    }

    #[test]
    fn test_ecg_slope_and_vessel_codes() {
        let answers = PatientAnswers {
            resting_ecg: RestingEcg::LeftVentricularHypertrophy,
            slope: StSlope::Flat,
            major_vessels: MajorVessels::Three,
            ..scenario_a()
        };
        let v = encode(&answers);
        assert_eq!(v.get("restecg"), Some(2.0));
        assert_eq!(v.get("slope"), Some(1.0));
        assert_eq!(v.get("ca"), Some(3.0));
    }

    #[test]
    fn test_numeric_fields_pass_through() {
        let answers = PatientAnswers {
            resting_bp: 132.5,
            oldpeak: 2.35,
            ..scenario_a()
        };
        let v = encode(&answers);
        assert_eq!(v.get("trestbps"), Some(132.5));
        assert_eq!(v.get("oldpeak"), Some(2.35));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let answers = scenario_a();
        let a = encode(&answers);
        let b = encode(&answers);
        let bits = |v: &FeatureVector| v.as_array().map(f64::to_bits);
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_feature_names_match_field_keys() {
        use crate::domain::answers::Field;
        let keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys, FEATURE_NAMES.to_vec());
    }
}
