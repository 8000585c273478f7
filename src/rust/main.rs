use psyscreen::{
    ArtifactManager, ContextBuilder, Outcome, PredictionContext, PredictionResult, Question,
    PredictorError, RawAnswer, RuntimeConfig,
};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum YesNo {
    #[value(name = "yes", alias = "YES")]
    Yes,
    #[value(name = "no", alias = "NO")]
    No,
}

impl YesNo {
    fn as_answer(self) -> &'static str {
        match self {
            Self::Yes => psyscreen::predictor::YES,
            Self::No => psyscreen::predictor::NO,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Race {
    #[value(name = "white-only", alias = "WHITE ONLY")]
    WhiteOnly,
    #[value(name = "non-white", alias = "NON-WHITE")]
    NonWhite,
}

impl Race {
    fn as_answer(self) -> &'static str {
        match self {
            Self::WhiteOnly => psyscreen::predictor::WHITE_ONLY,
            Self::NonWhite => psyscreen::predictor::NON_WHITE,
        }
    }
}

/// Predicts the presence of mental illness from patient characteristics.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding model.onnx and features.json
    /// [default: $PSYSCREEN_ARTIFACTS or the platform data directory]
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Path to the ONNX model (requires --features)
    #[arg(long, requires = "features", conflicts_with = "artifacts_dir")]
    model: Option<PathBuf>,

    /// Path to the JSON feature list (requires --model)
    #[arg(long, requires = "model")]
    features: Option<PathBuf>,

    /// Expected SHA-256 of the model file
    #[arg(long)]
    model_sha256: Option<String>,

    /// Expected SHA-256 of the feature list
    #[arg(long)]
    features_sha256: Option<String>,

    /// ONNX Runtime thread count (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// List the form questions and their options, then exit
    #[arg(long)]
    questions: bool,

    #[arg(long, value_enum, default_value = "no")]
    religious_preference: YesNo,

    #[arg(long, value_enum, default_value = "white-only")]
    race: Race,

    #[arg(long, value_enum, default_value = "yes")]
    criminal_justice_status: YesNo,

    /// Whether a critical clinical condition record is present
    #[arg(long, value_enum, default_value = "yes")]
    critical_clinical_record: YesNo,

    #[arg(long, value_enum, default_value = "yes")]
    no_chronic_medical_condition: YesNo,

    #[arg(long, value_enum, default_value = "yes")]
    intellectual_disability_missing: YesNo,

    #[arg(long, value_enum, default_value = "yes")]
    autism_spectrum_missing: YesNo,

    /// Whether the principal diagnosis record was missing
    #[arg(long, value_enum, default_value = "yes")]
    principal_diagnosis_missing: YesNo,

    #[arg(long, value_enum, default_value = "yes")]
    combined_diagnosis_education: YesNo,
}

impl Args {
    fn raw_answer(&self) -> RawAnswer {
        RawAnswer::new()
            .with_answer(Question::ReligiousPreference, self.religious_preference.as_answer())
            .with_answer(Question::Race, self.race.as_answer())
            .with_answer(Question::CriminalJusticeStatus, self.criminal_justice_status.as_answer())
            .with_answer(Question::CriticalClinicalRecord, self.critical_clinical_record.as_answer())
            .with_answer(Question::NoChronicMedicalCondition, self.no_chronic_medical_condition.as_answer())
            .with_answer(Question::IntellectualDisabilityMissing, self.intellectual_disability_missing.as_answer())
            .with_answer(Question::AutismSpectrumMissing, self.autism_spectrum_missing.as_answer())
            .with_answer(Question::PrincipalDiagnosisMissing, self.principal_diagnosis_missing.as_answer())
            .with_answer(Question::CombinedDiagnosisEducation, self.combined_diagnosis_education.as_answer())
    }

    fn artifact_manager(&self) -> ArtifactManager {
        match &self.artifacts_dir {
            Some(dir) => ArtifactManager::new(dir),
            None => ArtifactManager::new_default(),
        }
    }
}

fn load_context(args: &Args) -> Result<PredictionContext, PredictorError> {
    // checksums apply to whichever paths end up loaded
    let mut builder = ContextBuilder::new()
        .with_runtime_config(RuntimeConfig::with_threads(args.threads));
    if let Some(hash) = &args.model_sha256 {
        builder = builder.with_model_hash(hash);
    }
    if let Some(hash) = &args.features_sha256 {
        builder = builder.with_schema_hash(hash);
    }

    let builder = match (&args.model, &args.features) {
        (Some(model), Some(features)) => builder.with_custom_model(model, features)?,
        _ => builder.with_artifacts(&args.artifact_manager())?,
    };
    builder.build()
}

/// Message printed before exiting when the artifacts cannot be loaded.
fn startup_failure_message(err: &PredictorError) -> String {
    format!(
        "{}\nCannot serve predictions without a loadable model and feature list.",
        err
    )
}

fn print_questions() {
    for question in Question::ALL {
        println!("{}", question.label());
        println!("  key:     {}", question.key());
        println!("  options: {} (default: {})", question.options().join(", "), question.default_value());
        if let Some(help) = question.help() {
            println!("  help:    {}", help);
        }
    }
}

fn print_result(result: &PredictionResult) {
    println!("\nPrediction Result");
    println!("Prediction: {}", result.label);
    let prefix = match result.outcome {
        Outcome::Favorable => "[ok]",
        Outcome::Unfavorable => "[warning]",
        Outcome::Indeterminate => "[info]",
    };
    println!("{} {}", prefix, result.outcome.message());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.questions {
        print_questions();
        return Ok(());
    }

    let start_time = Instant::now();
    info!("Loading model and features...");

    let context = match load_context(&args) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("{}", startup_failure_message(&e));
            process::exit(1);
        }
    };
    info!("Model and features loaded successfully (took {:.2?})", start_time.elapsed());

    let answers = args.raw_answer();
    let result = context.predict(&answers).context("Prediction failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_startup_message_for_every_load_failure() {
        let failures = [
            PredictorError::ArtifactError("Model file not found: model.onnx".into()),
            PredictorError::SchemaError("Duplicate feature 'Race_WHITE ONLY' in schema".into()),
            PredictorError::ModelError("Failed to load model: protobuf parsing failed".into()),
        ];
        for err in &failures {
            let message = startup_failure_message(err);
            assert!(message.starts_with(&err.to_string()));
            assert!(message.contains("Cannot serve predictions"));
        }
    }

    #[test]
    fn test_checksum_flags_accepted_with_explicit_paths() {
        let args = Args::try_parse_from([
            "psyscreen",
            "--model", "m.onnx",
            "--features", "f.json",
            "--model-sha256", "abc",
            "--features-sha256", "def",
        ]).unwrap();
        assert_eq!(args.model_sha256.as_deref(), Some("abc"));
        assert_eq!(args.features_sha256.as_deref(), Some("def"));
    }

    #[test]
    fn test_explicit_paths_verify_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("m.onnx");
        let features = dir.path().join("f.json");
        std::fs::write(&model, b"placeholder").unwrap();
        std::fs::write(&features, r#"["Race_WHITE ONLY"]"#).unwrap();

        let args = Args::try_parse_from(vec![
            OsString::from("psyscreen"),
            "--model".into(), model.into_os_string(),
            "--features".into(), features.into_os_string(),
            "--features-sha256".into(), "0000".into(),
        ]).unwrap();
        let err = load_context(&args).err().unwrap();
        assert!(matches!(err, PredictorError::ArtifactError(ref msg) if msg.contains("Hash mismatch")));
    }
}
