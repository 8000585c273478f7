use std::collections::HashMap;
use std::path::{Path, PathBuf};
use ort::session::Session;
use ort::value::Tensor;
use log::{error, info};

use super::encoder::EncodedVector;
use super::error::PredictorError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A trained classifier consumed through a single operation.
///
/// Implementations are loaded once at startup and never mutated afterwards,
/// so they must be shareable across threads.
pub trait Predictor: Send + Sync {
    /// Returns the class index for one schema-shaped vector.
    fn predict(&self, vector: &EncodedVector) -> Result<i64, PredictorError>;
}

/// A classifier exported to ONNX, run through ONNX Runtime.
///
/// The model is expected to:
/// - Take one float tensor of shape [1, n_features] as its first input
/// - Produce the predicted class label as an int64 tensor in its first output
#[derive(Debug)]
pub struct OnnxPredictor {
    model_path: PathBuf,
    session: Session,
    input_name: String,
    num_features: usize,
}

impl OnnxPredictor {
    /// Loads the model and checks it has the input/output structure above.
    ///
    /// # Errors
    /// - `ArtifactError` if the model file does not exist
    /// - `ModelError` if ONNX Runtime cannot load the file or the structure is invalid
    pub fn load(
        model_path: impl AsRef<Path>,
        num_features: usize,
        config: &RuntimeConfig,
    ) -> Result<Self, PredictorError> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(PredictorError::ArtifactError(
                format!("Model file not found: {}", model_path.display())
            ));
        }

        let session = create_session_builder(config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load model {}: {}", model_path.display(), e);
                PredictorError::ModelError(format!("Failed to load model: {}", e))
            })?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        let input_name = session.inputs[0].name.clone();
        Ok(Self {
            model_path: model_path.to_path_buf(),
            session,
            input_name,
            num_features,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn validate_model(session: &Session) -> Result<(), PredictorError> {
        if session.inputs.is_empty() {
            return Err(PredictorError::ModelError(
                "Model must have at least 1 input for the feature vector".to_string()
            ));
        }
        if session.outputs.is_empty() {
            return Err(PredictorError::ModelError(
                "Model must have at least 1 output for the class label".to_string()
            ));
        }
        Ok(())
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, vector: &EncodedVector) -> Result<i64, PredictorError> {
        if vector.len() != self.num_features {
            return Err(PredictorError::ValidationError(format!(
                "Feature vector has {} columns, model expects {}",
                vector.len(), self.num_features
            )));
        }

        let row = vector.to_row().into_dyn();
        let input = row.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_name.as_str(), Tensor::from_array(&input)
            .map_err(|e| PredictorError::ModelError(format!("Failed to create input tensor: {}", e)))?);

        let outputs = self.session.run(input_tensors)
            .map_err(|e| PredictorError::ModelError(format!("Failed to run model: {}", e)))?;
        let labels = outputs[0].try_extract_tensor::<i64>()
            .map_err(|e| PredictorError::ModelError(format!("Failed to extract label tensor: {}", e)))?;

        labels.iter()
            .next()
            .copied()
            .ok_or_else(|| PredictorError::ModelError("Model returned an empty label tensor".into()))
    }
}
