use std::path::Path;
use std::sync::Arc;
use log::{info, warn};

use super::context::PredictionContext;
use super::error::PredictorError;
use super::model::{OnnxPredictor, Predictor};
use super::schema::FeatureSchema;
use crate::artifacts::ArtifactManager;
use crate::runtime::RuntimeConfig;

/// A builder for constructing a PredictionContext with a fluent interface.
///
/// Artifacts are loaded eagerly: a builder method that names a file either
/// loads it or fails, so a missing artifact stops startup before any request
/// is served.
#[derive(Default)]
pub struct ContextBuilder {
    model_path: Option<String>,
    schema_path: Option<String>,
    schema: Option<FeatureSchema>,
    predictor: Option<Box<dyn Predictor>>,
    runtime_config: RuntimeConfig,
    model_hash: Option<String>,
    schema_hash: Option<String>,
    conflict: Option<String>,
}

impl ContextBuilder {
    /// Creates a new empty ContextBuilder instance with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration used when loading an ONNX model
    ///
    /// Must be called before any method that loads the model.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Expected SHA-256 of the model file passed to [`with_custom_model`](Self::with_custom_model)
    ///
    /// Must be called before the model is loaded.
    pub fn with_model_hash(mut self, hash: impl Into<String>) -> Self {
        self.model_hash = Some(hash.into());
        self
    }

    /// Expected SHA-256 of the feature schema file passed to [`with_custom_model`](Self::with_custom_model)
    pub fn with_schema_hash(mut self, hash: impl Into<String>) -> Self {
        self.schema_hash = Some(hash.into());
        self
    }

    /// Loads the schema and model from the directory an [`ArtifactManager`]
    /// points at, after checking both files exist and match any configured
    /// checksums.
    ///
    /// # Returns
    /// * `Result<Self, PredictorError>` - The builder instance if successful, or an error if:
    ///   - An artifact is missing or fails verification (`ArtifactError`)
    ///   - The schema is invalid (`SchemaError`)
    ///   - The model cannot be loaded (`ModelError`)
    pub fn with_artifacts(self, manager: &ArtifactManager) -> Result<Self, PredictorError> {
        manager.ensure_artifacts()?;
        info!("Artifacts found in {}", manager.artifacts_dir().display());
        self.with_custom_model(manager.get_model_path(), manager.get_schema_path())
    }

    /// Loads the schema and model from explicit paths
    ///
    /// # Example
    /// ```no_run
    /// use psyscreen::ContextBuilder;
    ///
    /// let builder = ContextBuilder::new()
    ///     .with_custom_model("artifacts/model.onnx", "artifacts/features.json");
    /// ```
    pub fn with_custom_model(
        mut self,
        model_path: impl AsRef<Path>,
        schema_path: impl AsRef<Path>,
    ) -> Result<Self, PredictorError> {
        if self.predictor.is_some() || self.schema.is_some() {
            return Err(PredictorError::BuildError("Model and schema already set".to_string()));
        }
        let model_path = model_path.as_ref();
        let schema_path = schema_path.as_ref();

        // Validate paths exist
        if !schema_path.exists() {
            return Err(PredictorError::ArtifactError(
                format!("Feature schema file not found: {}", schema_path.display())
            ));
        }
        if !model_path.exists() {
            return Err(PredictorError::ArtifactError(
                format!("Model file not found: {}", model_path.display())
            ));
        }

        if let Some(expected) = &self.schema_hash {
            ArtifactManager::verify_file(schema_path, expected, "schema")?;
        }
        if let Some(expected) = &self.model_hash {
            ArtifactManager::verify_file(model_path, expected, "model")?;
        }

        let schema = FeatureSchema::from_file(schema_path)?;
        let predictor = OnnxPredictor::load(model_path, schema.len(), &self.runtime_config)?;
        info!("Model loaded from {}", model_path.display());

        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.schema_path = Some(schema_path.to_string_lossy().to_string());
        self.schema = Some(schema);
        self.predictor = Some(Box::new(predictor));
        Ok(self)
    }

    /// Uses an already loaded feature schema
    ///
    /// Not allowed once a model has been loaded from artifacts; `build` then fails.
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        if self.model_path.is_some() {
            self.conflict = Some("Feature schema cannot replace the one loaded with the model".to_string());
            return self;
        }
        self.schema = Some(schema);
        self
    }

    /// Uses any classifier implementing [`Predictor`] in place of an ONNX model
    ///
    /// Not allowed once a model has been loaded from artifacts; `build` then fails.
    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        if self.model_path.is_some() {
            self.conflict = Some("Predictor cannot replace the model loaded from artifacts".to_string());
            return self;
        }
        self.predictor = Some(Box::new(predictor));
        self
    }

    /// Builds and returns the final PredictionContext instance
    ///
    /// # Returns
    /// * `Result<PredictionContext, PredictorError>` - The constructed context if successful, or an error if:
    ///   - No feature schema has been set
    ///   - No predictor has been set
    ///   - The schema or predictor was replaced after loading a model from artifacts
    pub fn build(self) -> Result<PredictionContext, PredictorError> {
        if let Some(conflict) = self.conflict {
            return Err(PredictorError::BuildError(conflict));
        }
        let schema = self.schema
            .ok_or_else(|| PredictorError::BuildError("Feature schema must be set".to_string()))?;
        let predictor = self.predictor
            .ok_or_else(|| PredictorError::BuildError("Predictor must be set".to_string()))?;

        for question in schema.unmapped_questions() {
            warn!(
                "Feature '{}' for question '{}' is not in the schema; its answer will be ignored",
                question.mapping().feature,
                question
            );
        }

        Ok(PredictionContext {
            model_path: self.model_path,
            schema_path: self.schema_path,
            schema: Arc::new(schema),
            predictor: Arc::from(predictor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::EncodedVector;

    struct Fixed(i64);

    impl Predictor for Fixed {
        fn predict(&self, _vector: &EncodedVector) -> Result<i64, PredictorError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_build_requires_schema_and_predictor() {
        let result = ContextBuilder::new().with_predictor(Fixed(0)).build();
        assert!(matches!(result, Err(PredictorError::BuildError(_))));

        let schema = FeatureSchema::new(vec!["a"]).unwrap();
        let result = ContextBuilder::new().with_schema(schema).build();
        assert!(matches!(result, Err(PredictorError::BuildError(_))));
    }

    fn loaded_builder() -> ContextBuilder {
        ContextBuilder {
            model_path: Some("artifacts/model.onnx".to_string()),
            schema_path: Some("artifacts/features.json".to_string()),
            schema: Some(FeatureSchema::new(vec!["Race_WHITE ONLY", "Sex_MALE"]).unwrap()),
            predictor: Some(Box::new(Fixed(0))),
            ..ContextBuilder::default()
        }
    }

    #[test]
    fn test_loaded_pair_builds() {
        let context = loaded_builder().build().unwrap();
        assert_eq!(context.info().num_features, 2);
    }

    #[test]
    fn test_schema_cannot_replace_loaded_one() {
        let replacement = FeatureSchema::new(vec!["Race_WHITE ONLY"]).unwrap();
        let result = loaded_builder().with_schema(replacement).build();
        assert!(matches!(result, Err(PredictorError::BuildError(_))));
    }

    #[test]
    fn test_predictor_cannot_replace_loaded_model() {
        let result = loaded_builder().with_predictor(Fixed(2)).build();
        assert!(matches!(result, Err(PredictorError::BuildError(_))));
    }

    #[test]
    fn test_missing_artifacts_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ArtifactManager::new(dir.path());
        let result = ContextBuilder::new().with_artifacts(&manager);
        let err = result.err().expect("missing artifacts must fail");
        assert!(matches!(err, PredictorError::ArtifactError(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_model_with_schema_present() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("features.json");
        std::fs::write(&schema_path, r#"["Race_WHITE ONLY"]"#).unwrap();

        let result = ContextBuilder::new()
            .with_custom_model(dir.path().join("model.onnx"), &schema_path);
        assert!(matches!(result.err(), Some(PredictorError::ArtifactError(_))));
    }
}
