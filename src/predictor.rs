//! Inference on free text with a trained artifact.
//!
//! A [`Predictor`] is built once per process from a [`TrainedArtifact`] and
//! is immutable afterwards, so it can be shared across threads behind an
//! `Arc` and called concurrently.
//!
//! # Example
//!
//! ```no_run
//! use verity::predictor::Predictor;
//!
//! # fn main() -> verity::error::Result<()> {
//! let predictor = Predictor::load("model.bin")?;
//! let prediction = predictor.classify("Senate reported the budget vote")?;
//! println!("{} ({:.1}%)", prediction.label, prediction.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::NewsAnalyzer;
use crate::artifact::TrainedArtifact;
use crate::classifier::LogisticRegression;
use crate::corpus::Label;
use crate::error::{Result, VerityError};
use crate::vectorizer::TfIdfVectorizer;

/// Outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of `label`, in `[0.5, 1]`.
    pub confidence: f64,
    /// Whitespace-separated tokens in the raw input.
    pub word_count: usize,
}

/// A loaded model ready to classify text.
#[derive(Debug)]
pub struct Predictor {
    vectorizer: TfIdfVectorizer,
    classifier: LogisticRegression,
    artifact: TrainedArtifact,
}

impl Predictor {
    /// Validate `artifact` and rebuild the vectorizer and classifier from it.
    pub fn new(artifact: TrainedArtifact) -> Result<Self> {
        artifact.validate()?;

        let vectorizer = TfIdfVectorizer::from_vocabulary(
            Arc::new(NewsAnalyzer::new()?),
            artifact.vocabulary().clone(),
        );
        let classifier = LogisticRegression::from_parameters(artifact.parameters().clone())?;

        Ok(Self {
            vectorizer,
            classifier,
            artifact,
        })
    }

    /// Read an artifact file and build a predictor from it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(TrainedArtifact::load(path)?)
    }

    /// Classify one text.
    ///
    /// Empty or whitespace-only input fails with
    /// [`VerityError::EmptyInput`]; the predictor stays usable.
    pub fn classify(&self, text: &str) -> Result<Prediction> {
        if text.trim().is_empty() {
            return Err(VerityError::empty_input(
                "please enter some text to analyze",
            ));
        }

        let features = self.vectorizer.transform(text)?;
        Ok(Prediction {
            label: self.classifier.predict(&features)?,
            confidence: self.classifier.predict_proba(&features)?,
            word_count: text.split_whitespace().count(),
        })
    }

    pub fn artifact(&self) -> &TrainedArtifact {
        &self.artifact
    }
}

/// Classify `text` with `artifact` without keeping a [`Predictor`] around.
///
/// Every call clones the artifact and rebuilds the vectorizer and classifier.
/// Callers classifying more than one text should build a [`Predictor`] once
/// and reuse it.
pub fn classify(text: &str, artifact: &TrainedArtifact) -> Result<Prediction> {
    Predictor::new(artifact.clone())?.classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactMetadata;
    use crate::classifier::ModelParameters;
    use crate::vectorizer::{VectorizerConfig, Vocabulary};

    /// "hoax" pushes toward fake, "senate" toward real.
    fn artifact() -> TrainedArtifact {
        let vocabulary = Vocabulary::new(
            vec!["hoax".to_string(), "senate".to_string()],
            vec![1.5, 1.5],
        )
        .unwrap();
        let parameters = ModelParameters::new(vec![-3.0, 3.0], 0.25);
        TrainedArtifact::new(
            vocabulary,
            parameters,
            ArtifactMetadata::new(VectorizerConfig::default(), 2),
        )
        .unwrap()
    }

    #[test]
    fn test_classify() {
        let predictor = Predictor::new(artifact()).unwrap();

        let prediction = predictor.classify("The Senate met today").unwrap();
        assert_eq!(prediction.label, Label::Real);
        assert!(prediction.confidence > 0.9);
        assert_eq!(prediction.word_count, 4);

        let prediction = predictor.classify("total hoax!!").unwrap();
        assert_eq!(prediction.label, Label::Fake);
        assert!(prediction.confidence > 0.9);
        assert_eq!(prediction.word_count, 2);
    }

    #[test]
    fn test_out_of_vocabulary_uses_bias() {
        let predictor = Predictor::new(artifact()).unwrap();
        let prediction = predictor.classify("zebra quantum").unwrap();
        assert_eq!(prediction.label, Label::Real);
        let expected = 1.0 / (1.0 + (-0.25_f64).exp());
        assert!((prediction.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let predictor = Predictor::new(artifact()).unwrap();
        for text in ["", "   ", "\n\t "] {
            let err = predictor.classify(text).unwrap_err();
            assert!(matches!(err, VerityError::EmptyInput(_)));
            assert!(err.is_recoverable());
        }
        // Still usable afterwards.
        assert!(predictor.classify("senate").is_ok());
    }

    #[test]
    fn test_stop_words_only_is_not_empty_input() {
        let predictor = Predictor::new(artifact()).unwrap();
        let prediction = predictor.classify("the and of").unwrap();
        assert_eq!(prediction.word_count, 3);
    }

    #[test]
    fn test_free_function_matches_predictor() {
        let artifact = artifact();
        let predictor = Predictor::new(artifact.clone()).unwrap();
        let text = "senate hoax senate";
        assert_eq!(
            classify(text, &artifact).unwrap(),
            predictor.classify(text).unwrap()
        );
    }

    #[test]
    fn test_predictor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predictor>();

        let predictor = Arc::new(Predictor::new(artifact()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let predictor = Arc::clone(&predictor);
                std::thread::spawn(move || predictor.classify("senate hearing").unwrap())
            })
            .collect();
        let expected = predictor.classify("senate hearing").unwrap();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
