//! Error types for the Verity library.
//!
//! All errors are represented by the [`VerityError`] enum. Training-time
//! failures ([`VerityError::EmptyCorpus`], [`VerityError::DegenerateLabels`],
//! [`VerityError::Corpus`]) abort a run before any artifact is written,
//! while [`VerityError::EmptyInput`] is a per-call inference error the caller
//! is expected to recover from.
//!
//! # Examples
//!
//! ```
//! use verity::error::{Result, VerityError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(VerityError::invalid_argument("max_df must be in (0, 1]"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Verity operations.
///
/// Each variant is a distinguishable error kind so that calling layers (the
/// CLI, a UI, an API server) can map it to their own user-facing behavior.
#[derive(Error, Debug)]
pub enum VerityError {
    /// I/O errors (reading corpora, reading or writing artifacts)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary artifact encoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Fitting was attempted on zero documents.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// All training labels are identical, so there is nothing to separate.
    #[error("Degenerate labels: {0}")]
    DegenerateLabels(String),

    /// A component was used before it was fitted or loaded.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Inference was requested on empty or whitespace-only text.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Model parameters and vocabulary disagree (dimension, tokenizer or format).
    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// Malformed training source (missing column, unreadable row).
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Analysis-related errors (tokenizer construction)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid argument or configuration value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with VerityError.
pub type Result<T> = std::result::Result<T, VerityError>;

impl VerityError {
    /// Create a new empty corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        VerityError::EmptyCorpus(msg.into())
    }

    /// Create a new degenerate labels error.
    pub fn degenerate_labels<S: Into<String>>(msg: S) -> Self {
        VerityError::DegenerateLabels(msg.into())
    }

    /// Create a new not fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        VerityError::NotFitted(msg.into())
    }

    /// Create a new empty input error.
    pub fn empty_input<S: Into<String>>(msg: S) -> Self {
        VerityError::EmptyInput(msg.into())
    }

    /// Create a new artifact mismatch error.
    pub fn artifact_mismatch<S: Into<String>>(msg: S) -> Self {
        VerityError::ArtifactMismatch(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        VerityError::Corpus(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        VerityError::Analysis(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        VerityError::InvalidArgument(msg.into())
    }

    /// Whether the caller can recover by asking for different input.
    ///
    /// Only [`VerityError::EmptyInput`] qualifies; everything else is either
    /// a training failure or an integration bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VerityError::EmptyInput(_))
    }
}

impl From<bincode::Error> for VerityError {
    fn from(err: bincode::Error) -> Self {
        VerityError::Serialization(err.to_string())
    }
}
