use std::fmt;
use serde::{Deserialize, Serialize};

/// Display label for a class index produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    /// Class 0: absence
    No,
    /// Class 1: indeterminate
    Unknown,
    /// Class 2: presence
    Yes,
    /// Any index outside the label table
    #[serde(rename = "Prediction Error")]
    Error,
}

impl Label {
    /// Resolves a raw class index. Indices outside {0, 1, 2} yield [`Label::Error`].
    pub fn from_class_index(index: i64) -> Self {
        match index {
            0 => Self::No,
            1 => Self::Unknown,
            2 => Self::Yes,
            _ => Self::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::No => "NO",
            Self::Unknown => "UNKNOWN",
            Self::Yes => "YES",
            Self::Error => "Prediction Error",
        }
    }

    pub fn outcome(self) -> Outcome {
        match self {
            Self::No => Outcome::Favorable,
            Self::Yes => Outcome::Unfavorable,
            Self::Unknown | Self::Error => Outcome::Indeterminate,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative framing shown alongside a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Favorable,
    Unfavorable,
    Indeterminate,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Favorable => "The model predicts the absence of mental illness.",
            Self::Unfavorable => "The model predicts the presence of mental illness.",
            Self::Indeterminate => "The model was unable to make a clear prediction.",
        }
    }
}

/// Result of one pass through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub class_index: i64,
    pub label: Label,
    pub outcome: Outcome,
}

impl PredictionResult {
    pub fn from_class_index(class_index: i64) -> Self {
        let label = Label::from_class_index(class_index);
        Self {
            class_index,
            label,
            outcome: label.outcome(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.label != Label::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_indices() {
        assert_eq!(Label::from_class_index(0).as_str(), "NO");
        assert_eq!(Label::from_class_index(1).as_str(), "UNKNOWN");
        assert_eq!(Label::from_class_index(2).as_str(), "YES");
    }

    #[test]
    fn test_out_of_range_is_sentinel() {
        for index in [-1, 3, 7, i64::MAX, i64::MIN] {
            assert_eq!(Label::from_class_index(index), Label::Error);
        }
        assert_eq!(Label::Error.to_string(), "Prediction Error");
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(Label::Yes.outcome(), Outcome::Unfavorable);
        assert_eq!(Label::No.outcome(), Outcome::Favorable);
        assert_eq!(Label::Unknown.outcome(), Outcome::Indeterminate);
        assert_eq!(Label::Error.outcome(), Outcome::Indeterminate);
    }

    #[test]
    fn test_result_serializes() {
        let result = PredictionResult::from_class_index(2);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["class_index"], 2);
        assert_eq!(json["label"], "YES");
        assert_eq!(json["outcome"], "unfavorable");
    }

    #[test]
    fn test_sentinel_serializes_as_display_label() {
        let result = PredictionResult::from_class_index(7);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["class_index"], 7);
        assert_eq!(json["label"], Label::Error.to_string());
        assert_eq!(json["label"], "Prediction Error");
        assert_eq!(json["outcome"], "indeterminate");

        let parsed: PredictionResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.label, Label::Error);
    }

    #[test]
    fn test_unresolved_result() {
        let result = PredictionResult::from_class_index(7);
        assert!(!result.is_resolved());
        assert_eq!(result.outcome.message(), "The model was unable to make a clear prediction.");
    }
}
