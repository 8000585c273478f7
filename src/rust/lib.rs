//! Screening predictions from categorical patient characteristics.
//!
//! Answers to a fixed nine-question form are aligned to the feature schema a
//! classifier was trained on, the classifier produces a class index, and the
//! index is resolved to a display label.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use psyscreen::{ArtifactManager, PredictionContext, Question, RawAnswer};
//!
//! let context = PredictionContext::builder()
//!     .with_artifacts(&ArtifactManager::new("artifacts"))?
//!     .build()?;
//!
//! let answers = RawAnswer::with_defaults()
//!     .with_answer(Question::Race, "NON-WHITE")
//!     .with_answer(Question::CriticalClinicalRecord, "NO");
//!
//! let result = context.predict(&answers)?;
//! println!("Prediction: {}", result.label);
//! println!("{}", result.outcome.message());
//! # Ok(())
//! # }
//! ```
//!
//! # Custom classifiers
//!
//! Anything implementing [`Predictor`] can stand in for the ONNX model:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use psyscreen::{EncodedVector, FeatureSchema, Label, PredictionContext, Predictor, PredictorError, RawAnswer};
//!
//! struct Undecided;
//!
//! impl Predictor for Undecided {
//!     fn predict(&self, _vector: &EncodedVector) -> Result<i64, PredictorError> {
//!         Ok(1)
//!     }
//! }
//!
//! let context = PredictionContext::builder()
//!     .with_schema(FeatureSchema::new(vec!["Race_WHITE ONLY", "Serious Mental Illness_YES"])?)
//!     .with_predictor(Undecided)
//!     .build()?;
//!
//! let result = context.predict(&RawAnswer::with_defaults())?;
//! assert_eq!(result.label, Label::Unknown);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod predictor;
mod runtime;

pub use artifacts::{ArtifactError, ArtifactManager};
pub use predictor::{
    encode, ContextBuilder, ContextInfo, EncodedVector, FeatureMapping, FeatureSchema, Label,
    OnnxPredictor, Outcome, PredictionContext, PredictionResult, Predictor, PredictorError,
    Question, RawAnswer, QUESTION_TABLE,
};
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
