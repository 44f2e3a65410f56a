//! Labeled training corpora.
//!
//! A [`Corpus`] is built from a fake set and a real set, shuffled with a
//! seed and split into train/test partitions. The split boundary depends
//! only on the seed and the number of documents.

mod label;
mod loader;

pub use label::Label;
pub use loader::{CorpusLoader, CsvCorpusLoader, JsonlCorpusLoader, TEXT_FIELD, load_texts};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerityError};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of documents held out for evaluation by default.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// An article with its class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDocument {
    pub text: String,
    pub label: Label,
}

impl LabeledDocument {
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// An ordered collection of labeled documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    documents: Vec<LabeledDocument>,
}

impl Corpus {
    pub fn new(documents: Vec<LabeledDocument>) -> Self {
        Self { documents }
    }

    /// Label every fake text 0 and every real text 1, fakes first.
    pub fn from_sources<F, R>(fake: F, real: R) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let documents = fake
            .into_iter()
            .map(|text| LabeledDocument::new(text, Label::Fake))
            .chain(
                real.into_iter()
                    .map(|text| LabeledDocument::new(text, Label::Real)),
            )
            .collect();
        Self { documents }
    }

    /// Permute the documents with a seeded generator.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.documents.shuffle(&mut rng);
    }

    /// Split into `(train, test)` with `test = ceil(test_ratio × N)`.
    ///
    /// The first `N - test` documents form the training partition.
    pub fn train_test_split(self, test_ratio: f64) -> Result<(Corpus, Corpus)> {
        validate_test_ratio(test_ratio)?;

        let test_size = test_size(self.documents.len(), test_ratio);
        let mut train = self.documents;
        let test = train.split_off(train.len() - test_size);
        Ok((Corpus::new(train), Corpus::new(test)))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[LabeledDocument] {
        &self.documents
    }

    /// Document texts in corpus order.
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|doc| doc.text.as_str()).collect()
    }

    /// Labels in corpus order.
    pub fn labels(&self) -> Vec<Label> {
        self.documents.iter().map(|doc| doc.label).collect()
    }

    /// Number of documents carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.documents.iter().filter(|doc| doc.label == label).count()
    }
}

/// Number of held-out documents for a corpus of `n` documents.
pub fn test_size(n: usize, test_ratio: f64) -> usize {
    ((test_ratio * n as f64).ceil() as usize).min(n)
}

pub(crate) fn validate_test_ratio(test_ratio: f64) -> Result<()> {
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(VerityError::invalid_argument(format!(
            "test_ratio must be in [0, 1), got {test_ratio}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(n_fake: usize, n_real: usize) -> Corpus {
        Corpus::from_sources(
            (0..n_fake).map(|i| format!("fake {i}")),
            (0..n_real).map(|i| format!("real {i}")),
        )
    }

    #[test]
    fn test_from_sources_labels() {
        let corpus = corpus(3, 2);
        assert_eq!(corpus.len(), 5);
        assert_eq!(
            corpus.labels(),
            vec![Label::Fake, Label::Fake, Label::Fake, Label::Real, Label::Real]
        );
        assert_eq!(corpus.count(Label::Real), 2);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = corpus(20, 20);
        let mut b = corpus(20, 20);
        a.shuffle(DEFAULT_SEED);
        b.shuffle(DEFAULT_SEED);
        assert_eq!(a, b);

        let mut c = corpus(20, 20);
        c.shuffle(7);
        assert_ne!(a, c);

        // Shuffling permutes; it never relabels.
        assert_eq!(a.count(Label::Fake), 20);
        for doc in a.documents() {
            let expected = if doc.text.starts_with("fake") {
                Label::Fake
            } else {
                Label::Real
            };
            assert_eq!(doc.label, expected);
        }
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = corpus(5, 5).train_test_split(0.2).unwrap();
        assert_eq!((train.len(), test.len()), (8, 2));

        // ceil(0.2 * 11) = 3
        let (train, test) = corpus(6, 5).train_test_split(0.2).unwrap();
        assert_eq!((train.len(), test.len()), (8, 3));

        let (train, test) = corpus(2, 2).train_test_split(0.0).unwrap();
        assert_eq!((train.len(), test.len()), (4, 0));
    }

    #[test]
    fn test_split_is_disjoint() {
        let mut full = corpus(10, 10);
        full.shuffle(DEFAULT_SEED);
        let all: Vec<String> = full.documents().iter().map(|d| d.text.clone()).collect();

        let (train, test) = full.train_test_split(0.2).unwrap();
        let mut joined: Vec<String> = train
            .documents()
            .iter()
            .chain(test.documents())
            .map(|d| d.text.clone())
            .collect();
        assert_eq!(joined, all);

        joined.sort();
        joined.dedup();
        assert_eq!(joined.len(), 20);
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(corpus(1, 1).train_test_split(1.0).is_err());
        assert!(corpus(1, 1).train_test_split(-0.1).is_err());
    }

    #[test]
    fn test_test_size() {
        assert_eq!(test_size(0, 0.2), 0);
        assert_eq!(test_size(1, 0.2), 1);
        assert_eq!(test_size(100, 0.2), 20);
    }
}
