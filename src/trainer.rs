//! End-to-end training: corpus in, [`TrainedArtifact`] out.
//!
//! The flow is fixed:
//!
//! 1. label fake texts 0 and real texts 1 and concatenate them,
//! 2. shuffle with the configured seed,
//! 3. split off `ceil(test_ratio × N)` documents for evaluation,
//! 4. fit the vocabulary on the training partition only,
//! 5. vectorize both partitions and fit the classifier on the training one,
//! 6. report held-out accuracy.
//!
//! Persisting the artifact is left to the caller.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::NewsAnalyzer;
use crate::artifact::{ArtifactMetadata, TrainedArtifact};
use crate::classifier::{ClassifierConfig, LogisticRegression, TrainingStats};
use crate::corpus::{self, Corpus, DEFAULT_SEED, DEFAULT_TEST_RATIO, Label};
use crate::error::{Result, VerityError};
use crate::vectorizer::{TfIdfVectorizer, VectorizerConfig};

/// All training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Shuffle seed.
    pub seed: u64,
    /// Fraction of documents held out for evaluation, in `[0, 1)`.
    pub test_ratio: f64,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_ratio: DEFAULT_TEST_RATIO,
            vectorizer: VectorizerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TrainerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        corpus::validate_test_ratio(self.test_ratio)?;
        self.vectorizer.validate()?;
        self.classifier.validate()
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub artifact: TrainedArtifact,
    /// Held-out accuracy; `None` when the test partition is empty.
    pub accuracy: Option<f64>,
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    pub stats: TrainingStats,
}

/// Runs the training flow with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train on in-memory fake and real article texts.
    pub fn train<S: AsRef<str>>(&self, fake: &[S], real: &[S]) -> Result<TrainingReport> {
        self.config.validate()?;

        let mut corpus = Corpus::from_sources(
            fake.iter().map(|text| text.as_ref().to_string()),
            real.iter().map(|text| text.as_ref().to_string()),
        );
        if corpus.is_empty() {
            return Err(VerityError::empty_corpus("no fake or real documents"));
        }
        info!(
            "training on {} documents ({} fake, {} real)",
            corpus.len(),
            corpus.count(Label::Fake),
            corpus.count(Label::Real)
        );

        corpus.shuffle(self.config.seed);
        let (train, test) = corpus.train_test_split(self.config.test_ratio)?;
        if train.is_empty() {
            return Err(VerityError::empty_corpus(
                "training partition is empty after the split",
            ));
        }
        info!(
            "split: {} training, {} test (seed {})",
            train.len(),
            test.len(),
            self.config.seed
        );

        let mut vectorizer =
            TfIdfVectorizer::new(Arc::new(NewsAnalyzer::new()?), self.config.vectorizer.clone());
        let train_features = vectorizer.fit_transform(&train.texts())?;
        let vocabulary_size = vectorizer.vocabulary()?.len();
        info!("vocabulary: {vocabulary_size} terms");

        let mut classifier = LogisticRegression::new(self.config.classifier.clone());
        classifier.fit(&train_features, &train.labels())?;
        let stats = classifier
            .stats()
            .cloned()
            .ok_or_else(|| VerityError::not_fitted("classifier reported no training stats"))?;

        let accuracy = if test.is_empty() {
            None
        } else {
            let test_features = vectorizer.transform_batch(&test.texts())?;
            Some(classifier.score(&test_features, &test.labels())?)
        };
        match accuracy {
            Some(accuracy) => info!("held-out accuracy: {accuracy:.4}"),
            None => info!("no held-out documents; accuracy not computed"),
        }

        let metadata = ArtifactMetadata::new(self.config.vectorizer.clone(), train.len());
        let artifact = TrainedArtifact::new(
            vectorizer.into_vocabulary()?,
            classifier.into_parameters()?,
            metadata,
        )?;

        Ok(TrainingReport {
            artifact,
            accuracy,
            train_size: train.len(),
            test_size: test.len(),
            vocabulary_size,
            stats,
        })
    }

    /// Load both corpora from files and train.
    pub fn train_from_paths<P, Q>(&self, fake: P, real: Q) -> Result<TrainingReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let fake_texts = load_nonempty(fake.as_ref())?;
        let real_texts = load_nonempty(real.as_ref())?;
        info!(
            "loaded {} fake texts from {} and {} real texts from {}",
            fake_texts.len(),
            fake.as_ref().display(),
            real_texts.len(),
            real.as_ref().display()
        );
        self.train(&fake_texts, &real_texts)
    }
}

fn load_nonempty(path: &Path) -> Result<Vec<String>> {
    let texts = corpus::load_texts(path)?;
    if texts.is_empty() {
        return Err(VerityError::empty_corpus(format!(
            "{}: no documents with text",
            path.display()
        )));
    }
    Ok(texts)
}
