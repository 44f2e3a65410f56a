//! Trained artifacts: a vocabulary paired with the model fitted on it.
//!
//! An artifact is the unit of persistence. It is validated when constructed
//! and again when loaded, so a [`TrainedArtifact`] value always has exactly
//! one weight per vocabulary term and was produced by the analyzer this
//! build uses.
//!
//! Files ending in `.json` are written as pretty-printed JSON; any other
//! extension gets the compact `bincode` encoding. Both round-trip every
//! floating-point value exactly.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::NewsAnalyzer;
use crate::classifier::ModelParameters;
use crate::error::{Result, VerityError};
use crate::vectorizer::{VectorizerConfig, Vocabulary};

/// Version of the artifact layout. Bump on incompatible changes.
pub const FORMAT_VERSION: u32 = 1;

/// Encoding of an artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Binary,
}

impl ArtifactFormat {
    /// `.json` means JSON, anything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Binary,
        }
    }
}

/// Descriptive information stored next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Layout version, see [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Identity of the analyzer the vocabulary was built with.
    pub tokenizer: String,
    /// Settings the vocabulary was fitted with.
    pub vectorizer: VectorizerConfig,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Number of documents the model was fitted on.
    pub training_documents: usize,
}

impl ArtifactMetadata {
    /// Metadata for an artifact created now by this build.
    pub fn new(vectorizer: VectorizerConfig, training_documents: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            tokenizer: NewsAnalyzer::IDENTITY.to_string(),
            vectorizer,
            created_at: Utc::now(),
            training_documents,
        }
    }
}

/// Vocabulary, IDF weights and model parameters, kept together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedArtifact {
    vocabulary: Vocabulary,
    parameters: ModelParameters,
    metadata: ArtifactMetadata,
}

impl TrainedArtifact {
    /// Pair a vocabulary with parameters fitted on its features.
    pub fn new(
        vocabulary: Vocabulary,
        parameters: ModelParameters,
        metadata: ArtifactMetadata,
    ) -> Result<Self> {
        let artifact = Self {
            vocabulary,
            parameters,
            metadata,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the pairing and compatibility invariants.
    pub fn validate(&self) -> Result<()> {
        if self.metadata.format_version != FORMAT_VERSION {
            return Err(VerityError::artifact_mismatch(format!(
                "artifact format version {} is not supported (expected {})",
                self.metadata.format_version, FORMAT_VERSION
            )));
        }
        if self.metadata.tokenizer != NewsAnalyzer::IDENTITY {
            return Err(VerityError::artifact_mismatch(format!(
                "artifact was built with tokenizer '{}' but this build uses '{}'",
                self.metadata.tokenizer,
                NewsAnalyzer::IDENTITY
            )));
        }
        if self.parameters.dim() != self.vocabulary.len() {
            return Err(VerityError::artifact_mismatch(format!(
                "model has {} weights but the vocabulary has {} terms",
                self.parameters.dim(),
                self.vocabulary.len()
            )));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Encode in the given format.
    pub fn to_bytes(&self, format: ArtifactFormat) -> Result<Vec<u8>> {
        match format {
            ArtifactFormat::Json => Ok(serde_json::to_vec_pretty(self)?),
            ArtifactFormat::Binary => Ok(bincode::serialize(self)?),
        }
    }

    /// Decode and validate.
    pub fn from_bytes(bytes: &[u8], format: ArtifactFormat) -> Result<Self> {
        let artifact: TrainedArtifact = match format {
            ArtifactFormat::Json => serde_json::from_slice(bytes)?,
            ArtifactFormat::Binary => bincode::deserialize(bytes)?,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Write the artifact, replacing any existing file only once the new
    /// contents are fully on disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(ArtifactFormat::from_path(path))?;

        let staging = staging_path(path);
        if let Err(e) = fs::write(&staging, &bytes) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        info!(
            "saved artifact to {} ({} terms, {} bytes)",
            path.display(),
            self.vocabulary.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Read and validate an artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let artifact = Self::from_bytes(&bytes, ArtifactFormat::from_path(path))?;

        info!(
            "loaded artifact from {} ({} terms, created {})",
            path.display(),
            artifact.vocabulary.len(),
            artifact.metadata.created_at.to_rfc3339()
        );
        Ok(artifact)
    }
}

/// Hidden sibling of `path` used while writing.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TrainedArtifact {
        let vocabulary = Vocabulary::new(
            vec!["budget".to_string(), "shocking".to_string()],
            vec![1.0 + (5.0_f64 / 3.0).ln(), 1.0 + 0.1_f64.sqrt()],
        )
        .unwrap();
        let parameters = ModelParameters::new(vec![0.1 + 0.2, -1.0 / 3.0], 1e-17);
        TrainedArtifact::new(
            vocabulary,
            parameters,
            ArtifactMetadata::new(VectorizerConfig::default(), 4),
        )
        .unwrap()
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let vocabulary = Vocabulary::new(vec!["budget".to_string()], vec![1.0]).unwrap();
        let parameters = ModelParameters::new(vec![0.5, 0.5], 0.0);
        let result = TrainedArtifact::new(
            vocabulary,
            parameters,
            ArtifactMetadata::new(VectorizerConfig::default(), 1),
        );
        assert!(matches!(result, Err(VerityError::ArtifactMismatch(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model.json")),
            ArtifactFormat::Json
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model.JSON")),
            ArtifactFormat::Json
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model.bin")),
            ArtifactFormat::Binary
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model")),
            ArtifactFormat::Binary
        );
    }

    #[test]
    fn test_bytes_round_trip_is_exact() {
        let artifact = sample();
        for format in [ArtifactFormat::Json, ArtifactFormat::Binary] {
            let bytes = artifact.to_bytes(format).unwrap();
            let restored = TrainedArtifact::from_bytes(&bytes, format).unwrap();
            assert_eq!(restored, artifact);
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let artifact = sample();

        for name in ["model.json", "model.bin"] {
            let path = dir.path().join(name);
            artifact.save(&path).unwrap();
            assert!(!staging_path(&path).exists());

            let loaded = TrainedArtifact::load(&path).unwrap();
            assert_eq!(loaded, artifact);
        }
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"stale").unwrap();

        let artifact = sample();
        artifact.save(&path).unwrap();
        assert_eq!(TrainedArtifact::load(&path).unwrap(), artifact);
    }

    #[test]
    fn test_tokenizer_mismatch_on_load() {
        let mut artifact = sample();
        artifact.metadata.tokenizer = "whitespace-v0".to_string();
        let bytes = serde_json::to_vec(&artifact).unwrap();
        assert!(matches!(
            TrainedArtifact::from_bytes(&bytes, ArtifactFormat::Json),
            Err(VerityError::ArtifactMismatch(_))
        ));
    }

    #[test]
    fn test_format_version_mismatch_on_load() {
        let mut artifact = sample();
        artifact.metadata.format_version = FORMAT_VERSION + 1;
        let bytes = bincode::serialize(&artifact).unwrap();
        assert!(matches!(
            TrainedArtifact::from_bytes(&bytes, ArtifactFormat::Binary),
            Err(VerityError::ArtifactMismatch(_))
        ));
    }

    #[test]
    fn test_tampered_weights_on_load() {
        let artifact = sample();
        let mut json: serde_json::Value = serde_json::to_value(&artifact).unwrap();
        json["parameters"]["weights"] = serde_json::json!([1.0]);
        let bytes = serde_json::to_vec(&json).unwrap();
        assert!(matches!(
            TrainedArtifact::from_bytes(&bytes, ArtifactFormat::Json),
            Err(VerityError::ArtifactMismatch(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = TrainedArtifact::load(dir.path().join("absent.bin"));
        assert!(matches!(result, Err(VerityError::Io(_))));
    }
}
