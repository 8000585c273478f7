use std::fmt;
use std::sync::Arc;

use super::encoder::{encode, EncodedVector, RawAnswer};
use super::error::PredictorError;
use super::labels::PredictionResult;
use super::model::Predictor;
use super::schema::FeatureSchema;

/// The loaded artifacts a prediction runs against: the feature schema and the
/// classifier.
///
/// Built once at startup and immutable afterwards. Each request builds its
/// own [`RawAnswer`] and [`EncodedVector`], so a context can be shared
/// across threads with `Arc`:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use psyscreen::{EncodedVector, FeatureSchema, PredictionContext, Predictor, PredictorError, Question, RawAnswer};
/// use std::sync::Arc;
/// use std::thread;
///
/// struct AlwaysNo;
/// impl Predictor for AlwaysNo {
///     fn predict(&self, _: &EncodedVector) -> Result<i64, PredictorError> { Ok(0) }
/// }
///
/// let context = Arc::new(PredictionContext::builder()
///     .with_schema(FeatureSchema::new(vec!["Race_WHITE ONLY"])?)
///     .with_predictor(AlwaysNo)
///     .build()?);
///
/// let shared = Arc::clone(&context);
/// thread::spawn(move || {
///     let answers = RawAnswer::new().with_answer(Question::Race, "WHITE ONLY");
///     shared.predict(&answers).unwrap();
/// }).join().unwrap();
/// # Ok(())
/// # }
/// ```
pub struct PredictionContext {
    pub(crate) model_path: Option<String>,
    pub(crate) schema_path: Option<String>,
    pub(crate) schema: Arc<FeatureSchema>,
    pub(crate) predictor: Arc<dyn Predictor>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<PredictionContext>();
    }
};

impl fmt::Debug for PredictionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionContext")
            .field("model_path", &self.model_path)
            .field("schema_path", &self.schema_path)
            .field("num_features", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl PredictionContext {
    /// Creates a ContextBuilder for fluent construction
    pub fn builder() -> super::builder::ContextBuilder {
        super::builder::ContextBuilder::new()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Returns information about the loaded artifacts
    pub fn info(&self) -> super::ContextInfo {
        let unmapped_questions = self.schema.unmapped_questions();
        super::ContextInfo {
            model_path: self.model_path.clone(),
            schema_path: self.schema_path.clone(),
            num_features: self.schema.len(),
            mapped_features: super::encoder::QUESTION_TABLE.len() - unmapped_questions.len(),
            unmapped_questions,
        }
    }

    /// Aligns the answers to this context's feature schema.
    pub fn encode(&self, answers: &RawAnswer) -> EncodedVector {
        encode(answers, &self.schema)
    }

    /// Runs the full pipeline for one set of answers.
    ///
    /// A class index outside the label table is not an error: it resolves to
    /// [`Label::Error`](super::Label::Error). Errors come only from the
    /// predictor itself.
    pub fn predict(&self, answers: &RawAnswer) -> Result<PredictionResult, PredictorError> {
        let vector = self.encode(answers);
        log::debug!("Encoded {} features, active: {:?}", vector.len(), vector.active_features());

        let class_index = self.predictor.predict(&vector)?;
        let result = PredictionResult::from_class_index(class_index);
        if !result.is_resolved() {
            log::warn!("Model returned class index {} outside the label table", class_index);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{Label, Question};

    struct ActiveCount;

    impl Predictor for ActiveCount {
        fn predict(&self, vector: &EncodedVector) -> Result<i64, PredictorError> {
            Ok(vector.active_features().len() as i64)
        }
    }

    fn setup_context() -> PredictionContext {
        PredictionContext::builder()
            .with_schema(FeatureSchema::new(vec![
                "Race_WHITE ONLY",
                "Criminal Justice Status_YES",
                "Serious Mental Illness_YES",
            ]).unwrap())
            .with_predictor(ActiveCount)
            .build()
            .expect("Failed to build context")
    }

    #[test]
    fn test_context_info() {
        let info = setup_context().info();
        assert_eq!(info.num_features, 3);
        assert_eq!(info.mapped_features, 3);
        assert_eq!(info.unmapped_questions.len(), 6);
        assert!(info.model_path.is_none());
    }

    #[test]
    fn test_predict_resolves_labels() {
        let context = setup_context();
        let none = RawAnswer::new();
        assert_eq!(context.predict(&none).unwrap().label, Label::No);

        let two = RawAnswer::new()
            .with_answer(Question::Race, "WHITE ONLY")
            .with_answer(Question::CriminalJusticeStatus, "YES");
        assert_eq!(context.predict(&two).unwrap().label, Label::Yes);

        let three = two.with_answer(Question::CriticalClinicalRecord, "YES");
        let result = context.predict(&three).unwrap();
        assert_eq!(result.class_index, 3);
        assert_eq!(result.label, Label::Error);
    }
}
