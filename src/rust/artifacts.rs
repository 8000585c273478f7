use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use std::env;
use sha2::{Sha256, Digest};
use log;

pub const MODEL_FILE: &str = "model.onnx";
pub const SCHEMA_FILE: &str = "features.json";
pub const ARTIFACTS_ENV: &str = "PSYSCREEN_ARTIFACTS";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model files not found. Please ensure 'model.onnx' and 'features.json' exist (missing: {0})")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Locates the model and feature-schema artifacts and checks their integrity.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    artifacts_dir: PathBuf,
    model_hash: Option<String>,
    schema_hash: Option<String>,
}

impl ArtifactManager {
    /// Creates a manager over the default artifacts directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_artifacts_dir())
    }

    /// Returns the default artifacts directory path
    pub fn get_default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(ARTIFACTS_ENV) {
            return PathBuf::from(path);
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("psyscreen").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("psyscreen").join("artifacts");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("psyscreen").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            artifacts_dir: artifacts_dir.as_ref().to_path_buf(),
            model_hash: None,
            schema_hash: None,
        }
    }

    /// Expected SHA-256 of the model file, as lowercase hex.
    pub fn with_model_hash(mut self, hash: impl Into<String>) -> Self {
        self.model_hash = Some(hash.into().to_lowercase());
        self
    }

    /// Expected SHA-256 of the feature schema file, as lowercase hex.
    pub fn with_schema_hash(mut self, hash: impl Into<String>) -> Self {
        self.schema_hash = Some(hash.into().to_lowercase());
        self
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.artifacts_dir.join(MODEL_FILE)
    }

    pub fn get_schema_path(&self) -> PathBuf {
        self.artifacts_dir.join(SCHEMA_FILE)
    }

    pub fn missing_artifacts(&self) -> Vec<PathBuf> {
        [self.get_model_path(), self.get_schema_path()]
            .into_iter()
            .filter(|path| !path.exists())
            .collect()
    }

    pub fn hash_file(path: &Path) -> Result<String, ArtifactError> {
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Compares a file's SHA-256 against an expected hex digest (case-insensitive).
    pub fn verify_file(path: &Path, expected_hash: &str, file_type: &str) -> Result<(), ArtifactError> {
        log::info!("Verifying {} file: {:?}", file_type, path);
        let expected_hash = expected_hash.to_lowercase();
        let actual = Self::hash_file(path)?;
        if actual != expected_hash {
            log::error!("{} hash mismatch: expected {}, got {}", file_type, expected_hash, actual);
            return Err(ArtifactError::HashMismatch {
                file_type: file_type.to_string(),
                expected: expected_hash.to_string(),
                actual,
            });
        }
        Ok(())
    }

    /// Checks that both artifacts exist and, where an expected hash was
    /// configured, that the file content matches it.
    pub fn ensure_artifacts(&self) -> Result<(), ArtifactError> {
        let missing = self.missing_artifacts();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
            log::error!("Missing artifacts: {}", names.join(", "));
            return Err(ArtifactError::NotFound(names.join(", ")));
        }

        if let Some(expected) = &self.model_hash {
            Self::verify_file(&self.get_model_path(), expected, "model")?;
        }
        if let Some(expected) = &self.schema_hash {
            Self::verify_file(&self.get_schema_path(), expected, "schema")?;
        }
        if self.model_hash.is_none() && self.schema_hash.is_none() {
            log::warn!("No artifact checksums configured, skipping integrity verification");
        }
        Ok(())
    }
}
