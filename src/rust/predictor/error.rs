use ort::Error as OrtError;
use std::fmt;

use crate::artifacts::ArtifactError;

/// Represents the different types of errors that can occur in the prediction pipeline.
#[derive(Debug)]
pub enum PredictorError {
    /// A startup artifact is missing or unreadable
    ArtifactError(String),
    /// The feature schema artifact is malformed
    SchemaError(String),
    /// Error occurred while loading or running the ONNX model
    ModelError(String),
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl PredictorError {
    /// Returns true for errors that must stop the process before it serves any request.
    /// `ModelError` is excluded because inference can raise it too; a model that fails
    /// to load at startup is still fatal to the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ArtifactError(_) | Self::SchemaError(_) | Self::BuildError(_))
    }
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactError(msg) => write!(f, "Artifact error: {}", msg),
            Self::SchemaError(msg) => write!(f, "Schema error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for PredictorError {}

impl From<OrtError> for PredictorError {
    fn from(err: OrtError) -> Self {
        PredictorError::ModelError(err.to_string())
    }
}

impl From<ArtifactError> for PredictorError {
    fn from(err: ArtifactError) -> Self {
        PredictorError::ArtifactError(err.to_string())
    }
}
