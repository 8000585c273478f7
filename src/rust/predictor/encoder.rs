use std::collections::HashMap;
use std::fmt;
use ndarray::Array2;

use super::error::PredictorError;
use super::schema::FeatureSchema;

pub const YES: &str = "YES";
pub const NO: &str = "NO";
pub const WHITE_ONLY: &str = "WHITE ONLY";
pub const NON_WHITE: &str = "NON-WHITE";

const BINARY_OPTIONS: &[&str] = &[YES, NO];

/// One of the nine categorical questions presented on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    ReligiousPreference,
    Race,
    CriminalJusticeStatus,
    CriticalClinicalRecord,
    NoChronicMedicalCondition,
    IntellectualDisabilityMissing,
    AutismSpectrumMissing,
    PrincipalDiagnosisMissing,
    CombinedDiagnosisEducation,
}

impl Question {
    pub const ALL: [Question; 9] = [
        Question::ReligiousPreference,
        Question::Race,
        Question::CriminalJusticeStatus,
        Question::CriticalClinicalRecord,
        Question::NoChronicMedicalCondition,
        Question::IntellectualDisabilityMissing,
        Question::AutismSpectrumMissing,
        Question::PrincipalDiagnosisMissing,
        Question::CombinedDiagnosisEducation,
    ];

    /// The key under which this question's answer is stored in a [`RawAnswer`].
    pub fn key(self) -> &'static str {
        match self {
            Self::ReligiousPreference => "religious preference",
            Self::Race => "race",
            Self::CriminalJusticeStatus => "criminal justice status",
            Self::CriticalClinicalRecord => "critical clinical record",
            Self::NoChronicMedicalCondition => "no chronic medical condition",
            Self::IntellectualDisabilityMissing => "intellectual disability info missing",
            Self::AutismSpectrumMissing => "autism spectrum info missing",
            Self::PrincipalDiagnosisMissing => "principal diagnosis info missing",
            Self::CombinedDiagnosisEducation => "combined diagnosis & education",
        }
    }

    /// Label shown to the person filling in the form.
    pub fn label(self) -> &'static str {
        match self {
            Self::ReligiousPreference => "Religious Preference",
            Self::Race => "Race",
            Self::CriminalJusticeStatus => "Criminal Justice Status",
            Self::CriticalClinicalRecord => "Critical Clinical Record (indicator)",
            Self::NoChronicMedicalCondition => "No Chronic Medical Condition",
            Self::IntellectualDisabilityMissing => "Intellectual Disability Info (available or missing)",
            Self::AutismSpectrumMissing => "Autism Spectrum Info (available or missing)",
            Self::PrincipalDiagnosisMissing => "Principal Diagnosis Information (available or missing)",
            Self::CombinedDiagnosisEducation => "Combined Diagnosis & Education",
        }
    }

    pub fn help(self) -> Option<&'static str> {
        match self {
            Self::CriticalClinicalRecord => Some(
                "Indicates whether a critical clinical condition record is present. \
                 This factor was identified as important for improving predictions, \
                 especially for minority classes."
            ),
            Self::PrincipalDiagnosisMissing => Some(
                "Indicates whether the principal diagnosis record was missing. \
                 Patterns of missingness are highly predictive in this dataset."
            ),
            _ => None,
        }
    }

    /// The closed set of values this question accepts, default first.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::Race => &[WHITE_ONLY, NON_WHITE],
            Self::ReligiousPreference => &[NO, YES],
            _ => BINARY_OPTIONS,
        }
    }

    pub fn default_value(self) -> &'static str {
        self.options()[0]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.key() == key)
    }

    /// The correspondence-table row for this question.
    pub fn mapping(self) -> &'static FeatureMapping {
        // every question has exactly one row
        &QUESTION_TABLE[self as usize]
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ties a question to the schema column it drives and the value that sets it to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureMapping {
    pub question: Question,
    pub feature: &'static str,
    pub affirmative: &'static str,
}

/// Question-key to feature-name correspondence table, in `Question::ALL` order.
///
/// "critical clinical record" deliberately drives the model's
/// "Serious Mental Illness_YES" column.
pub static QUESTION_TABLE: [FeatureMapping; 9] = [
    FeatureMapping {
        question: Question::ReligiousPreference,
        feature: "Religious Preference_I BELONG TO A FORMAL RELIGIOUS GROUP",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::Race,
        feature: "Race_WHITE ONLY",
        affirmative: WHITE_ONLY,
    },
    FeatureMapping {
        question: Question::CriminalJusticeStatus,
        feature: "Criminal Justice Status_YES",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::CriticalClinicalRecord,
        feature: "Serious Mental Illness_YES",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::NoChronicMedicalCondition,
        feature: "No Chronic Med Condition_YES",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::IntellectualDisabilityMissing,
        feature: "Intellectual Disability_Missing",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::AutismSpectrumMissing,
        feature: "Autism Spectrum_Missing",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::PrincipalDiagnosisMissing,
        feature: "Principal Diagnosis Class_Missing",
        affirmative: YES,
    },
    FeatureMapping {
        question: Question::CombinedDiagnosisEducation,
        feature: "Combined_Diagnosis_Education_MENTAL ILLNESS_NOT APPLICABLE",
        affirmative: YES,
    },
];

fn mapping_for_feature(feature: &str) -> Option<&'static FeatureMapping> {
    QUESTION_TABLE.iter().find(|mapping| mapping.feature == feature)
}

/// The categorical answers collected for a single prediction request.
///
/// Keys that do not name a known question are kept but ignored by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAnswer {
    answers: HashMap<String, String>,
}

impl RawAnswer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every question set to its form default.
    pub fn with_defaults() -> Self {
        Question::ALL.into_iter()
            .map(|q| (q.key(), q.default_value()))
            .collect()
    }

    /// Sets the answer for a known question.
    ///
    /// # Example
    /// ```
    /// use psyscreen::{Question, RawAnswer};
    ///
    /// let answers = RawAnswer::new()
    ///     .with_answer(Question::Race, "WHITE ONLY")
    ///     .with_answer(Question::CriminalJusticeStatus, "NO");
    /// assert_eq!(answers.answer(Question::Race), Some("WHITE ONLY"));
    /// ```
    pub fn with_answer(mut self, question: Question, value: impl Into<String>) -> Self {
        self.answers.insert(question.key().to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.answers.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    pub fn answer(&self, question: Question) -> Option<&str> {
        self.get(question.key())
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Checks that every known question's answer is one of its options.
    ///
    /// Unknown keys and unanswered questions pass; the encoder treats them as 0.
    pub fn validate(&self) -> Result<(), PredictorError> {
        for question in Question::ALL {
            if let Some(value) = self.answer(question) {
                if !question.options().contains(&value) {
                    return Err(PredictorError::ValidationError(format!(
                        "Invalid answer '{}' for '{}' (expected one of: {})",
                        value,
                        question.key(),
                        question.options().join(", ")
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawAnswer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A 0/1 vector aligned to a [`FeatureSchema`], in schema column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedVector {
    entries: Vec<(String, u8)>,
}

impl EncodedVector {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, feature: &str) -> Option<u8> {
        self.entries.iter()
            .find(|(name, _)| name == feature)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> Vec<u8> {
        self.entries.iter().map(|&(_, value)| value).collect()
    }

    /// Features set to 1, in column order.
    pub fn active_features(&self) -> Vec<&str> {
        self.iter()
            .filter(|&(_, value)| value == 1)
            .map(|(name, _)| name)
            .collect()
    }

    /// The vector as a single-row `[1, n]` matrix, the layout classifiers take.
    pub fn to_row(&self) -> Array2<f32> {
        Array2::from_shape_fn((1, self.entries.len()), |(_, j)| f32::from(self.entries[j].1))
    }
}

/// Aligns raw answers to the schema.
///
/// Each schema column is 1 only when the correspondence table maps it to a
/// question and that question's answer equals the affirmative value. Columns
/// the table does not name are always 0.
pub fn encode(answers: &RawAnswer, schema: &FeatureSchema) -> EncodedVector {
    let entries = schema.iter()
        .map(|feature| {
            let active = mapping_for_feature(feature)
                .and_then(|mapping| answers.answer(mapping.question).map(|v| v == mapping.affirmative))
                .unwrap_or(false);
            (feature.to_string(), u8::from(active))
        })
        .collect();

    EncodedVector { entries }
}
