//! Form answers for heart disease prediction.
//!
//! Every categorical question has a closed label set. The label order is the
//! order the form presents the options in, and is also the order the encoder
//! derives most codes from.

use serde::{Deserialize, Serialize};

use crate::HeartcheckError;

/// One of the thirteen questions on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Sex,
    ChestPain,
    RestingBloodPressure,
    Cholesterol,
    FastingBloodSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    Oldpeak,
    Slope,
    MajorVessels,
    Thalassemia,
}

impl Field {
    /// All fields in feature-vector order.
    pub const ALL: [Field; 13] = [
        Field::Age,
        Field::Sex,
        Field::ChestPain,
        Field::RestingBloodPressure,
        Field::Cholesterol,
        Field::FastingBloodSugar,
        Field::RestingEcg,
        Field::MaxHeartRate,
        Field::ExerciseAngina,
        Field::Oldpeak,
        Field::Slope,
        Field::MajorVessels,
        Field::Thalassemia,
    ];

    /// Human-readable question label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPain => "Chest Pain Type",
            Self::RestingBloodPressure => "Resting Blood Pressure (mm Hg)",
            Self::Cholesterol => "Cholesterol (mg/dl)",
            Self::FastingBloodSugar => "Fasting Blood Sugar > 120?",
            Self::RestingEcg => "Resting ECG Results",
            Self::MaxHeartRate => "Max Heart Rate Achieved",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::Oldpeak => "Oldpeak",
            Self::Slope => "Slope of ST Segment",
            Self::MajorVessels => "Major Vessels Colored (0-3)",
            Self::Thalassemia => "Thalassemia Type",
        }
    }

    /// Short feature name used by the model artifact and the JSON interface.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPain => "cp",
            Self::RestingBloodPressure => "trestbps",
            Self::Cholesterol => "chol",
            Self::FastingBloodSugar => "fbs",
            Self::RestingEcg => "restecg",
            Self::MaxHeartRate => "thalach",
            Self::ExerciseAngina => "exang",
            Self::Oldpeak => "oldpeak",
            Self::Slope => "slope",
            Self::MajorVessels => "ca",
            Self::Thalassemia => "thal",
        }
    }

    fn invalid(self, reason: impl Into<String>) -> HeartcheckError {
        HeartcheckError::InvalidInput {
            field: self,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A closed set of labels offered by a select field.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Every option, in the order the form lists them.
    const ALL: &'static [Self];

    /// Display label.
    fn label(self) -> &'static str;

    /// Exact-label lookup. Surrounding whitespace is ignored.
    fn from_label(label: &str) -> Option<Self>;

    /// Zero-based position within [`Choice::ALL`].
    fn position(self) -> usize;

    /// All labels, in order.
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Choice for Sex {
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Male => 0,
            Self::Female => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChestPainType {
    #[default]
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

impl Choice for ChestPainType {
    const ALL: &'static [Self] = &[
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginalPain,
        Self::Asymptomatic,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical Angina",
            Self::AtypicalAngina => "Atypical Angina",
            Self::NonAnginalPain => "Non-anginal Pain",
            Self::Asymptomatic => "Asymptomatic",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Typical Angina" => Some(Self::TypicalAngina),
            "Atypical Angina" => Some(Self::AtypicalAngina),
            "Non-anginal Pain" => Some(Self::NonAnginalPain),
            "Asymptomatic" => Some(Self::Asymptomatic),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::TypicalAngina => 0,
            Self::AtypicalAngina => 1,
            Self::NonAnginalPain => 2,
            Self::Asymptomatic => 3,
        }
    }
}

/// Answer to a yes/no question (fasting blood sugar, exercise angina).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    Yes,
    No,
}

impl Choice for YesNo {
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Yes => 0,
            Self::No => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestingEcg {
    #[default]
    Normal,
    StTAbnormality,
    LeftVentricularHypertrophy,
}

impl Choice for RestingEcg {
    const ALL: &'static [Self] = &[
        Self::Normal,
        Self::StTAbnormality,
        Self::LeftVentricularHypertrophy,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::StTAbnormality => "ST-T Abnormality",
            Self::LeftVentricularHypertrophy => "Left Ventricular Hypertrophy",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Normal" => Some(Self::Normal),
            "ST-T Abnormality" => Some(Self::StTAbnormality),
            "Left Ventricular Hypertrophy" => Some(Self::LeftVentricularHypertrophy),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::StTAbnormality => 1,
            Self::LeftVentricularHypertrophy => 2,
        }
    }
}

/// Slope of the peak exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StSlope {
    #[default]
    Upsloping,
    Flat,
    Downsloping,
}

impl Choice for StSlope {
    const ALL: &'static [Self] = &[Self::Upsloping, Self::Flat, Self::Downsloping];

    fn label(self) -> &'static str {
        match self {
            Self::Upsloping => "Upsloping",
            Self::Flat => "Flat",
            Self::Downsloping => "Downsloping",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Upsloping" => Some(Self::Upsloping),
            "Flat" => Some(Self::Flat),
            "Downsloping" => Some(Self::Downsloping),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Upsloping => 0,
            Self::Flat => 1,
            Self::Downsloping => 2,
        }
    }
}

/// Number of major vessels colored by fluoroscopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MajorVessels {
    #[default]
    Zero,
    One,
    Two,
    Three,
}

impl MajorVessels {
    /// Lookup by vessel count.
    #[must_use]
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    #[must_use]
    pub fn count(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl Choice for MajorVessels {
    const ALL: &'static [Self] = &[Self::Zero, Self::One, Self::Two, Self::Three];

    fn label(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "0" => Some(Self::Zero),
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "3" => Some(Self::Three),
            _ => None,
        }
    }

    fn position(self) -> usize {
        usize::from(self.count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Thalassemia {
    #[default]
    Normal,
    FixedDefect,
    ReversibleDefect,
}

impl Choice for Thalassemia {
    const ALL: &'static [Self] = &[Self::Normal, Self::FixedDefect, Self::ReversibleDefect];

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::FixedDefect => "Fixed Defect",
            Self::ReversibleDefect => "Reversible Defect",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Normal" => Some(Self::Normal),
            "Fixed Defect" => Some(Self::FixedDefect),
            "Reversible Defect" => Some(Self::ReversibleDefect),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::FixedDefect => 1,
            Self::ReversibleDefect => 2,
        }
    }
}

/// Age bounds accepted by the form.
pub const AGE_RANGE: std::ops::RangeInclusive<u8> = 1..=120;

/// Validated, typed answers to the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAnswers {
    /// Age in years
    pub age: u8,
    pub sex: Sex,
    pub chest_pain: ChestPainType,
    /// Resting blood pressure in mm Hg
    pub resting_bp: f64,
    /// Serum cholesterol in mg/dl
    pub cholesterol: f64,
    /// Fasting blood sugar above 120 mg/dl
    pub fasting_blood_sugar: YesNo,
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved (bpm)
    pub max_heart_rate: f64,
    pub exercise_angina: YesNo,
    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,
    pub slope: StSlope,
    pub major_vessels: MajorVessels,
    pub thalassemia: Thalassemia,
}

impl Default for PatientAnswers {
    /// The values the form starts out with.
    fn default() -> Self {
        Self {
            age: 45,
            sex: Sex::Male,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 120.0,
            cholesterol: 200.0,
            fasting_blood_sugar: YesNo::Yes,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150.0,
            exercise_angina: YesNo::Yes,
            oldpeak: 1.0,
            slope: StSlope::Upsloping,
            major_vessels: MajorVessels::Zero,
            thalassemia: Thalassemia::Normal,
        }
    }
}

impl PatientAnswers {
    /// Check the numeric fields against their declared domains.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<(), HeartcheckError> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(Field::Age.invalid(format!(
                "{} out of range [{}, {}]",
                self.age,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            )));
        }

        let non_negative = [
            (Field::RestingBloodPressure, self.resting_bp),
            (Field::Cholesterol, self.cholesterol),
            (Field::MaxHeartRate, self.max_heart_rate),
        ];
        for (field, value) in non_negative {
            check_finite(field, value)?;
            if value < 0.0 {
                return Err(field.invalid(format!("{value} must not be negative")));
            }
        }

        check_finite(Field::Oldpeak, self.oldpeak)?;
        Ok(())
    }

    /// Parse and validate untyped answers.
    ///
    /// Fields are checked in feature-vector order; the first failure wins.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the offending field.
    pub fn from_raw(raw: &RawAnswers) -> Result<Self, HeartcheckError> {
        let answers = Self {
            age: parse_age(raw.age.as_ref())?,
            sex: parse_choice(Field::Sex, raw.sex.as_ref())?,
            chest_pain: parse_choice(Field::ChestPain, raw.cp.as_ref())?,
            resting_bp: parse_number(Field::RestingBloodPressure, raw.trestbps.as_ref())?,
            cholesterol: parse_number(Field::Cholesterol, raw.chol.as_ref())?,
            fasting_blood_sugar: parse_choice(Field::FastingBloodSugar, raw.fbs.as_ref())?,
            resting_ecg: parse_choice(Field::RestingEcg, raw.restecg.as_ref())?,
            max_heart_rate: parse_number(Field::MaxHeartRate, raw.thalach.as_ref())?,
            exercise_angina: parse_choice(Field::ExerciseAngina, raw.exang.as_ref())?,
            oldpeak: parse_number(Field::Oldpeak, raw.oldpeak.as_ref())?,
            slope: parse_choice(Field::Slope, raw.slope.as_ref())?,
            major_vessels: parse_vessels(raw.ca.as_ref())?,
            thalassemia: parse_choice(Field::Thalassemia, raw.thal.as_ref())?,
        };
        answers.validate()?;
        Ok(answers)
    }
}

/// A single untyped answer, as a form or JSON document delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// Any other JSON shape (bool, array, object). Always rejected by parsing.
    Other(serde_json::Value),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Other(serde_json::Value::Number(n)),
            },
            other => Self::Other(other),
        }
    }
}

/// Untyped answers keyed by feature name. Missing answers are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAnswers {
    #[serde(default)]
    pub age: Option<RawValue>,
    #[serde(default)]
    pub sex: Option<RawValue>,
    #[serde(default)]
    pub cp: Option<RawValue>,
    #[serde(default)]
    pub trestbps: Option<RawValue>,
    #[serde(default)]
    pub chol: Option<RawValue>,
    #[serde(default)]
    pub fbs: Option<RawValue>,
    #[serde(default)]
    pub restecg: Option<RawValue>,
    #[serde(default)]
    pub thalach: Option<RawValue>,
    #[serde(default)]
    pub exang: Option<RawValue>,
    #[serde(default)]
    pub oldpeak: Option<RawValue>,
    #[serde(default)]
    pub slope: Option<RawValue>,
    #[serde(default)]
    pub ca: Option<RawValue>,
    #[serde(default)]
    pub thal: Option<RawValue>,
}

impl RawAnswers {
    /// Mutable access to the slot for a field.
    pub fn slot_mut(&mut self, field: Field) -> &mut Option<RawValue> {
        match field {
            Field::Age => &mut self.age,
            Field::Sex => &mut self.sex,
            Field::ChestPain => &mut self.cp,
            Field::RestingBloodPressure => &mut self.trestbps,
            Field::Cholesterol => &mut self.chol,
            Field::FastingBloodSugar => &mut self.fbs,
            Field::RestingEcg => &mut self.restecg,
            Field::MaxHeartRate => &mut self.thalach,
            Field::ExerciseAngina => &mut self.exang,
            Field::Oldpeak => &mut self.oldpeak,
            Field::Slope => &mut self.slope,
            Field::MajorVessels => &mut self.ca,
            Field::Thalassemia => &mut self.thal,
        }
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<RawValue>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }
}

impl From<&PatientAnswers> for RawAnswers {
    fn from(a: &PatientAnswers) -> Self {
        Self::default()
            .with(Field::Age, f64::from(a.age))
            .with(Field::Sex, a.sex.label())
            .with(Field::ChestPain, a.chest_pain.label())
            .with(Field::RestingBloodPressure, a.resting_bp)
            .with(Field::Cholesterol, a.cholesterol)
            .with(Field::FastingBloodSugar, a.fasting_blood_sugar.label())
            .with(Field::RestingEcg, a.resting_ecg.label())
            .with(Field::MaxHeartRate, a.max_heart_rate)
            .with(Field::ExerciseAngina, a.exercise_angina.label())
            .with(Field::Oldpeak, a.oldpeak)
            .with(Field::Slope, a.slope.label())
            .with(Field::MajorVessels, f64::from(a.major_vessels.count()))
            .with(Field::Thalassemia, a.thalassemia.label())
    }
}

fn check_finite(field: Field, value: f64) -> Result<(), HeartcheckError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(field.invalid(format!("{value} is not a finite number")))
    }
}

fn require(field: Field, value: Option<&RawValue>) -> Result<&RawValue, HeartcheckError> {
    value.ok_or_else(|| field.invalid("missing value"))
}

fn parse_number(field: Field, value: Option<&RawValue>) -> Result<f64, HeartcheckError> {
    let n = match require(field, value)? {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| field.invalid(format!("{s:?} is not a number")))?,
        RawValue::Other(v) => return Err(field.invalid(format!("{v} is not a number"))),
    };
    check_finite(field, n)?;
    Ok(n)
}

fn parse_whole(field: Field, value: Option<&RawValue>) -> Result<u8, HeartcheckError> {
    let n = parse_number(field, value)?;
    if n.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&n) {
        return Err(field.invalid(format!("{n} is not a whole number in range")));
    }
    Ok(n as u8)
}

fn parse_age(value: Option<&RawValue>) -> Result<u8, HeartcheckError> {
    parse_whole(Field::Age, value)
}

fn parse_vessels(value: Option<&RawValue>) -> Result<MajorVessels, HeartcheckError> {
    let field = Field::MajorVessels;
    let count = parse_whole(field, value)?;
    MajorVessels::from_count(count)
        .ok_or_else(|| field.invalid(format!("{count} out of range [0, 3]")))
}

fn parse_choice<C: Choice>(field: Field, value: Option<&RawValue>) -> Result<C, HeartcheckError> {
    match require(field, value)? {
        RawValue::Text(s) => C::from_label(s).ok_or_else(|| {
            field.invalid(format!(
                "{s:?} is not one of {}",
                C::labels().join(", ")
            ))
        }),
        RawValue::Number(n) => Err(field.invalid(format!(
            "expected one of {}, got number {n}",
            C::labels().join(", ")
        ))),
        RawValue::Other(v) => Err(field.invalid(format!(
            "expected one of {}, got {v}",
            C::labels().join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> RawAnswers {
        RawAnswers::default()
            .with(Field::Age, 45.0)
            .with(Field::Sex, "Male")
            .with(Field::ChestPain, "Typical Angina")
            .with(Field::RestingBloodPressure, 120.0)
            .with(Field::Cholesterol, 200.0)
            .with(Field::FastingBloodSugar, "No")
            .with(Field::RestingEcg, "Normal")
            .with(Field::MaxHeartRate, 150.0)
            .with(Field::ExerciseAngina, "No")
            .with(Field::Oldpeak, 1.0)
            .with(Field::Slope, "Upsloping")
            .with(Field::MajorVessels, 0.0)
            .with(Field::Thalassemia, "Normal")
    }

    fn invalid_field(raw: &RawAnswers) -> Field {
        PatientAnswers::from_raw(raw)
            .expect_err("Should reject")
            .field()
            .expect("Should name a field")
    }

    #[test]
    fn test_from_raw_parses_scenario() {
        let answers = PatientAnswers::from_raw(&scenario_a()).expect("Should parse");
        assert_eq!(answers.age, 45);
        assert_eq!(answers.sex, Sex::Male);
        assert_eq!(answers.fasting_blood_sugar, YesNo::No);
        assert_eq!(answers.major_vessels, MajorVessels::Zero);
        assert_eq!(answers.thalassemia, Thalassemia::Normal);
    }

    #[test]
    fn test_numeric_text_is_accepted() {
        let raw = scenario_a()
            .with(Field::Oldpeak, " 2.3 ")
            .with(Field::MajorVessels, "2");
        let answers = PatientAnswers::from_raw(&raw).expect("Should parse");
        assert!((answers.oldpeak - 2.3).abs() < f64::EPSILON);
        assert_eq!(answers.major_vessels, MajorVessels::Two);
    }

    #[test]
    fn test_unknown_label_names_field() {
        let raw = scenario_a().with(Field::ChestPain, "Crushing");
        assert_eq!(invalid_field(&raw), Field::ChestPain);

        let raw = scenario_a().with(Field::Thalassemia, "normal");
        assert_eq!(invalid_field(&raw), Field::Thalassemia);

        let raw = scenario_a().with(Field::Sex, 1.0);
        assert_eq!(invalid_field(&raw), Field::Sex);
    }

    #[test]
    fn test_non_numeric_names_field() {
        let raw = scenario_a().with(Field::Cholesterol, "high");
        assert_eq!(invalid_field(&raw), Field::Cholesterol);
    }

    #[test]
    fn test_missing_value_names_field() {
        let mut raw = scenario_a();
        *raw.slot_mut(Field::Slope) = None;
        assert_eq!(invalid_field(&raw), Field::Slope);
    }

    #[test]
    fn test_age_domain() {
        assert_eq!(invalid_field(&scenario_a().with(Field::Age, 0.0)), Field::Age);
        assert_eq!(invalid_field(&scenario_a().with(Field::Age, 121.0)), Field::Age);
        assert_eq!(invalid_field(&scenario_a().with(Field::Age, 45.5)), Field::Age);
        assert!(PatientAnswers::from_raw(&scenario_a().with(Field::Age, 120.0)).is_ok());
    }

    #[test]
    fn test_vessel_domain() {
        let raw = scenario_a().with(Field::MajorVessels, 4.0);
        assert_eq!(invalid_field(&raw), Field::MajorVessels);
    }

    #[test]
    fn test_negative_measurement_rejected() {
        let raw = scenario_a().with(Field::MaxHeartRate, -1.0);
        assert_eq!(invalid_field(&raw), Field::MaxHeartRate);

        // ST depression may legitimately be negative.
        assert!(PatientAnswers::from_raw(&scenario_a().with(Field::Oldpeak, -0.5)).is_ok());
    }

    #[test]
    fn test_first_offending_field_wins() {
        let raw = scenario_a()
            .with(Field::Thalassemia, "bogus")
            .with(Field::Sex, "bogus");
        assert_eq!(invalid_field(&raw), Field::Sex);
    }

    #[test]
    fn test_labels_round_trip_through_lookup() {
        for t in Thalassemia::ALL {
            assert_eq!(Thalassemia::from_label(t.label()), Some(*t));
        }
        for e in RestingEcg::ALL {
            assert_eq!(RestingEcg::from_label(e.label()), Some(*e));
        }
    }

    #[test]
    fn test_json_deserialization() {
        let json = r#"{"age": 61, "sex": "Female", "cp": "Asymptomatic", "trestbps": "130",
            "chol": 330, "fbs": "No", "restecg": "Normal", "thalach": 169, "exang": "No",
            "oldpeak": 0, "slope": "Upsloping", "ca": 0, "thal": "Normal"}"#;
        let raw: RawAnswers = serde_json::from_str(json).expect("Should deserialize");
        let answers = PatientAnswers::from_raw(&raw).expect("Should parse");
        assert_eq!(answers.sex, Sex::Female);
        assert!((answers.resting_bp - 130.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_typed_answers_convert_back_to_raw() {
        let answers = PatientAnswers::default();
        let reparsed = PatientAnswers::from_raw(&RawAnswers::from(&answers)).expect("Should parse");
        assert_eq!(reparsed, answers);
    }

    #[test]
    fn test_json_wrong_shape_names_field() {
        let json = r#"{"age": true, "sex": "Male", "cp": "Typical Angina", "trestbps": 120,
            "chol": 200, "fbs": "No", "restecg": "Normal", "thalach": 150, "exang": "No",
            "oldpeak": 1.0, "slope": "Upsloping", "ca": 0, "thal": "Normal"}"#;
        let raw: RawAnswers = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(invalid_field(&raw), Field::Age);

        let raw = scenario_a().with(Field::ChestPain, serde_json::json!(["x"]));
        assert_eq!(invalid_field(&raw), Field::ChestPain);
    }

    #[test]
    fn test_json_null_is_missing() {
        let raw: RawAnswers = serde_json::from_str(r#"{"age": null}"#).expect("Should deserialize");
        assert_eq!(raw.age, None);
        assert_eq!(invalid_field(&raw), Field::Age);
    }
}
