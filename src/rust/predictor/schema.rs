use std::collections::HashSet;
use std::fs;
use std::path::Path;
use log::info;

use super::encoder::{Question, QUESTION_TABLE};
use super::error::PredictorError;

/// The ordered list of feature names the trained model expects as input.
///
/// The order is fixed at training time; every vector handed to a
/// [`Predictor`](super::model::Predictor) has exactly this length and column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    features: Vec<String>,
}

impl FeatureSchema {
    /// Creates a schema from an ordered list of feature names.
    ///
    /// # Errors
    /// - `SchemaError` if the list is empty
    /// - `SchemaError` if a feature name is empty or appears more than once
    ///
    /// # Example
    /// ```
    /// use psyscreen::FeatureSchema;
    ///
    /// let schema = FeatureSchema::new(vec!["Race_WHITE ONLY", "Age_65+"]).unwrap();
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn new(features: Vec<impl Into<String>>) -> Result<Self, PredictorError> {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();

        if features.is_empty() {
            return Err(PredictorError::SchemaError("Feature schema cannot be empty".into()));
        }
        if let Some(pos) = features.iter().position(|f| f.is_empty()) {
            return Err(PredictorError::SchemaError(
                format!("Feature {} has an empty name", pos + 1)
            ));
        }

        let mut seen = HashSet::with_capacity(features.len());
        for feature in &features {
            if !seen.insert(feature.as_str()) {
                return Err(PredictorError::SchemaError(
                    format!("Duplicate feature '{}' in schema", feature)
                ));
            }
        }

        Ok(Self { features })
    }

    /// Loads a schema from a JSON file holding an array of feature names.
    ///
    /// A missing or unreadable file is an `ArtifactError`; readable content
    /// that is not a valid feature list is a `SchemaError`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            PredictorError::ArtifactError(format!("Failed to read feature schema {}: {}", path.display(), e))
        })?;
        let schema = Self::from_json(&contents)?;
        info!("Loaded feature schema with {} features from {}", schema.len(), path.display());
        Ok(schema)
    }

    /// Parses a schema from a JSON array of strings.
    pub fn from_json(json: &str) -> Result<Self, PredictorError> {
        let features: Vec<String> = serde_json::from_str(json)
            .map_err(|e| PredictorError::SchemaError(format!("Invalid feature schema: {}", e)))?;
        Self::new(features)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Feature names in model column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }

    /// Questions whose feature is absent from this schema. Answers to these
    /// questions can never influence a prediction.
    pub fn unmapped_questions(&self) -> Vec<Question> {
        QUESTION_TABLE.iter()
            .filter(|mapping| !self.contains(mapping.feature))
            .map(|mapping| mapping.question)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_schema() {
        let result = FeatureSchema::new(Vec::<String>::new());
        assert!(matches!(result, Err(PredictorError::SchemaError(_))));
    }

    #[test]
    fn test_rejects_duplicate_features() {
        let result = FeatureSchema::new(vec!["a", "b", "a"]);
        assert!(matches!(result, Err(PredictorError::SchemaError(_))));
    }

    #[test]
    fn test_rejects_empty_feature_name() {
        assert!(FeatureSchema::new(vec!["a", ""]).is_err());
    }

    #[test]
    fn test_from_json_preserves_order() {
        let schema = FeatureSchema::from_json(r#"["z", "a", "m"]"#).unwrap();
        assert_eq!(schema.iter().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_from_json_rejects_non_list() {
        let result = FeatureSchema::from_json(r#"{"features": 3}"#);
        assert!(matches!(result, Err(PredictorError::SchemaError(_))));
    }

    #[test]
    fn test_missing_file_is_artifact_error() {
        let result = FeatureSchema::from_file("/nonexistent/psyscreen/features.json");
        assert!(matches!(result, Err(PredictorError::ArtifactError(_))));
    }

    #[test]
    fn test_unmapped_questions() {
        let schema = FeatureSchema::new(vec!["Race_WHITE ONLY", "Unrelated"]).unwrap();
        let unmapped = schema.unmapped_questions();
        assert_eq!(unmapped.len(), QUESTION_TABLE.len() - 1);
        assert!(!unmapped.contains(&Question::Race));
    }
}
