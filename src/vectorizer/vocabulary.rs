//! Fitted vocabulary: term ↔ index mapping plus IDF weights.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerityError};

/// The set of terms retained by a fitted vectorizer.
///
/// Term `i` has index `i` and IDF weight `idf[i]`. Vocabularies produced by
/// [`TfIdfVectorizer::fit`](super::TfIdfVectorizer::fit) list their terms in
/// lexicographic order, which is what makes fitting reproducible.
///
/// Only `terms` and `idf` are serialized; the lookup table is rebuilt on
/// deserialization, so a persisted vocabulary cannot carry an inconsistent
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyData", into = "VocabularyData")]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct VocabularyData {
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl Vocabulary {
    /// Build a vocabulary from parallel term and IDF lists.
    ///
    /// Fails if the lists differ in length, a term repeats, or an IDF weight
    /// is not finite.
    pub fn new(terms: Vec<String>, idf: Vec<f64>) -> Result<Self> {
        if terms.len() != idf.len() {
            return Err(VerityError::artifact_mismatch(format!(
                "vocabulary has {} terms but {} IDF weights",
                terms.len(),
                idf.len()
            )));
        }
        if let Some(weight) = idf.iter().find(|w| !w.is_finite()) {
            return Err(VerityError::artifact_mismatch(format!(
                "non-finite IDF weight {weight}"
            )));
        }

        let mut index = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(VerityError::artifact_mismatch(format!(
                    "duplicate vocabulary term '{term}'"
                )));
            }
        }

        Ok(Self { terms, idf, index })
    }

    /// An empty vocabulary.
    pub fn empty() -> Self {
        Self {
            terms: Vec::new(),
            idf: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no term survived fitting.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Index of `term`, if it is in the vocabulary.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Whether `term` is in the vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Term stored at `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// IDF weight of the term at `index`.
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    /// All terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// All IDF weights in index order.
    pub fn idf_weights(&self) -> &[f64] {
        &self.idf
    }

    /// Iterate over `(index, term, idf)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, f64)> + '_ {
        self.terms
            .iter()
            .zip(self.idf.iter())
            .enumerate()
            .map(|(i, (term, &idf))| (i, term.as_str(), idf))
    }
}

impl TryFrom<VocabularyData> for Vocabulary {
    type Error = VerityError;

    fn try_from(data: VocabularyData) -> Result<Self> {
        Vocabulary::new(data.terms, data.idf)
    }
}

impl From<Vocabulary> for VocabularyData {
    fn from(vocabulary: Vocabulary) -> Self {
        VocabularyData {
            terms: vocabulary.terms,
            idf: vocabulary.idf,
        }
    }
}
