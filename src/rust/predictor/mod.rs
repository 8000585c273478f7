mod builder;
mod context;
mod encoder;
mod error;
mod labels;
mod model;
mod schema;

pub use builder::ContextBuilder;
pub use context::PredictionContext;
pub use encoder::{encode, EncodedVector, FeatureMapping, Question, RawAnswer, QUESTION_TABLE};
pub use encoder::{NON_WHITE, NO, WHITE_ONLY, YES};
pub use error::PredictorError;
pub use labels::{Label, Outcome, PredictionResult};
pub use model::{OnnxPredictor, Predictor};
pub use schema::FeatureSchema;

/// Information about a loaded prediction context
#[derive(Debug, Clone)]
pub struct ContextInfo {
    pub model_path: Option<String>,
    pub schema_path: Option<String>,
    pub num_features: usize,
    /// Number of form questions whose feature appears in the schema
    pub mapped_features: usize,
    pub unmapped_questions: Vec<Question>,
}
