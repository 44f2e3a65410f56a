//! TF-IDF vectorizer for article feature extraction.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, NewsAnalyzer};
use crate::error::{Result, VerityError};
use crate::vectorizer::sparse::FeatureVector;
use crate::vectorizer::vocabulary::Vocabulary;

/// Configuration for vocabulary fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Document-frequency ceiling: terms present in more than
    /// `max_df × N` documents are dropped.
    pub max_df: f64,
    /// Terms present in fewer than `min_df` documents are dropped.
    pub min_df: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_df: 0.7,
            min_df: 1,
        }
    }
}

impl VectorizerConfig {
    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(VerityError::invalid_argument(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.min_df == 0 {
            return Err(VerityError::invalid_argument("min_df must be at least 1"));
        }
        Ok(())
    }
}

/// TF-IDF vectorizer for text feature extraction.
///
/// Fitting learns a [`Vocabulary`]; transforming counts in-vocabulary terms,
/// multiplies the counts by IDF and L2-normalizes the result.
pub struct TfIdfVectorizer {
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
    /// Fitting configuration.
    config: VectorizerConfig,
    /// Fitted vocabulary, `None` until `fit` succeeds.
    vocabulary: Option<Vocabulary>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field(
                "vocabulary_size",
                &self.vocabulary.as_ref().map(Vocabulary::len),
            )
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(Arc::new(NewsAnalyzer::default()), VectorizerConfig::default())
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(analyzer: Arc<dyn Analyzer>, config: VectorizerConfig) -> Self {
        Self {
            analyzer,
            config,
            vocabulary: None,
        }
    }

    /// Rebuild a fitted vectorizer from a persisted vocabulary.
    pub fn from_vocabulary(analyzer: Arc<dyn Analyzer>, vocabulary: Vocabulary) -> Self {
        Self {
            analyzer,
            config: VectorizerConfig::default(),
            vocabulary: Some(vocabulary),
        }
    }

    /// Fit the vocabulary on training documents.
    ///
    /// `idf(t) = ln((1 + N) / (1 + df(t))) + 1`. The resulting vocabulary may
    /// be empty when every term is a stop word or above the ceiling.
    pub fn fit<S>(&mut self, documents: &[S]) -> Result<&Vocabulary>
    where
        S: AsRef<str> + Sync,
    {
        self.config.validate()?;
        if documents.is_empty() {
            return Err(VerityError::empty_corpus(
                "cannot fit a vocabulary on zero documents",
            ));
        }

        let n_documents = documents.len();
        let analyzer = &self.analyzer;
        let unique_terms: Vec<HashSet<String>> = documents
            .par_iter()
            .map(|doc| {
                analyzer
                    .terms(doc.as_ref())
                    .map(|terms| terms.into_iter().collect())
            })
            .collect::<Result<_>>()?;

        // BTreeMap keeps terms sorted, which fixes the index assignment.
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for terms in unique_terms {
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let max_doc_count = self.config.max_df * n_documents as f64;
        let seen = document_frequency.len();
        let mut terms = Vec::new();
        let mut idf = Vec::new();
        for (term, df) in document_frequency {
            if (df as f64) > max_doc_count || df < self.config.min_df {
                continue;
            }
            idf.push(((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0);
            terms.push(term);
        }

        debug!(
            "fitted vocabulary on {} documents: {} distinct terms, {} retained",
            n_documents,
            seen,
            terms.len()
        );

        Ok(&*self.vocabulary.insert(Vocabulary::new(terms, idf)?))
    }

    /// Transform a document into an L2-normalized TF-IDF feature vector.
    ///
    /// Terms outside the vocabulary are ignored.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let vocabulary = self.vocabulary()?;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyzer.terms(document)? {
            if let Some(index) = vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let weights = counts.into_iter().filter_map(|(index, tf)| {
            vocabulary.idf(index).map(|idf| (index, tf * idf))
        });
        let mut features = FeatureVector::from_pairs(vocabulary.len(), weights);
        features.normalize();
        Ok(features)
    }

    /// Transform many documents in parallel, preserving order.
    pub fn transform_batch<S>(&self, documents: &[S]) -> Result<Vec<FeatureVector>>
    where
        S: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    /// Fit on `documents` and transform them.
    pub fn fit_transform<S>(&mut self, documents: &[S]) -> Result<Vec<FeatureVector>>
    where
        S: AsRef<str> + Sync,
    {
        self.fit(documents)?;
        self.transform_batch(documents)
    }

    /// The fitted vocabulary.
    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        self.vocabulary
            .as_ref()
            .ok_or_else(|| VerityError::not_fitted("TfIdfVectorizer::fit has not been called"))
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Give up ownership of the fitted vocabulary.
    pub fn into_vocabulary(self) -> Result<Vocabulary> {
        self.vocabulary
            .ok_or_else(|| VerityError::not_fitted("TfIdfVectorizer::fit has not been called"))
    }

    /// The analyzer this vectorizer tokenizes with.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// The fitting configuration.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents() -> Vec<&'static str> {
        vec![
            "senators reported the budget vote",
            "shocking secret cure doctors hide",
            "officials reported quarterly budget figures",
            "shocking celebrity secret revealed",
        ]
    }

    #[test]
    fn test_tfidf_vectorizer() {
        let mut vectorizer = TfIdfVectorizer::default();
        vectorizer.fit(&documents()).unwrap();
        let vocabulary = vectorizer.vocabulary().unwrap();
        assert!(!vocabulary.is_empty());

        let features = vectorizer.transform("shocking budget").unwrap();
        assert_eq!(features.dim(), vocabulary.len());
        assert_eq!(features.nnz(), 2);
        assert!((features.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_idf_formula() {
        let mut vectorizer = TfIdfVectorizer::default();
        let vocabulary = vectorizer.fit(&documents()).unwrap().clone();

        // "shocking" appears in 2 of 4 documents.
        let index = vocabulary.get("shocking").unwrap();
        let expected = (5.0_f64 / 3.0).ln() + 1.0;
        assert!((vocabulary.idf(index).unwrap() - expected).abs() < 1e-12);

        // "cure" appears once.
        let index = vocabulary.get("cure").unwrap();
        let expected = (5.0_f64 / 2.0).ln() + 1.0;
        assert!((vocabulary.idf(index).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_terms_are_sorted() {
        let mut vectorizer = TfIdfVectorizer::default();
        let vocabulary = vectorizer.fit(&documents()).unwrap();
        let mut sorted = vocabulary.terms().to_vec();
        sorted.sort();
        assert_eq!(vocabulary.terms(), sorted.as_slice());
    }

    #[test]
    fn test_fit_is_reproducible() {
        let mut first = TfIdfVectorizer::default();
        let mut second = TfIdfVectorizer::default();
        let a = first.fit(&documents()).unwrap().clone();
        let b = second.fit(&documents()).unwrap().clone();
        assert_eq!(a.terms(), b.terms());
        for (x, y) in a.idf_weights().iter().zip(b.idf_weights()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_max_df_ceiling() {
        // "budget" is in 3 of 4 documents: 3 > 0.7 * 4.
        let docs = vec![
            "budget vote",
            "budget hearing",
            "budget cuts",
            "celebrity gossip",
        ];
        let mut vectorizer = TfIdfVectorizer::default();
        let vocabulary = vectorizer.fit(&docs).unwrap();
        assert!(!vocabulary.contains("budget"));
        assert!(vocabulary.contains("vote"));
    }

    #[test]
    fn test_min_df_floor() {
        let config = VectorizerConfig {
            max_df: 1.0,
            min_df: 2,
        };
        let mut vectorizer = TfIdfVectorizer::new(Arc::new(NewsAnalyzer::default()), config);
        let vocabulary = vectorizer.fit(&documents()).unwrap();
        assert!(vocabulary.contains("reported"));
        assert!(!vocabulary.contains("cure"));
    }

    #[test]
    fn test_stop_words_and_ceiling_yield_empty_vocabulary() {
        let docs = vec!["the and of news", "news is the", "news was for them"];
        let mut vectorizer = TfIdfVectorizer::default();
        let vocabulary = vectorizer.fit(&docs).unwrap();
        assert!(vocabulary.is_empty());

        let features = vectorizer.transform("news of the day").unwrap();
        assert!(features.is_zero());
        assert_eq!(features.dim(), 0);
    }

    #[test]
    fn test_out_of_vocabulary_text_is_zero() {
        let mut vectorizer = TfIdfVectorizer::default();
        vectorizer.fit(&documents()).unwrap();
        let features = vectorizer.transform("zebra quantum xylophone").unwrap();
        assert!(features.is_zero());
        assert_eq!(features.dim(), vectorizer.vocabulary().unwrap().len());
    }

    #[test]
    fn test_term_frequency_counts() {
        let mut vectorizer = TfIdfVectorizer::default();
        vectorizer.fit(&documents()).unwrap();
        let vocabulary = vectorizer.vocabulary().unwrap();
        let cure = vocabulary.get("cure").unwrap();
        let vote = vocabulary.get("vote").unwrap();

        // Same IDF for both, so a 2:1 count ratio survives normalization.
        let features = vectorizer.transform("cure cure vote").unwrap();
        assert!((features.get(cure) / features.get(vote) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_corpus() {
        let mut vectorizer = TfIdfVectorizer::default();
        let docs: Vec<String> = Vec::new();
        assert!(matches!(
            vectorizer.fit(&docs),
            Err(VerityError::EmptyCorpus(_))
        ));
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = TfIdfVectorizer::default();
        assert!(matches!(
            vectorizer.transform("anything"),
            Err(VerityError::NotFitted(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let config = VectorizerConfig {
            max_df: 0.0,
            min_df: 1,
        };
        let mut vectorizer = TfIdfVectorizer::new(Arc::new(NewsAnalyzer::default()), config);
        assert!(matches!(
            vectorizer.fit(&documents()),
            Err(VerityError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_transform_batch_preserves_order() {
        let mut vectorizer = TfIdfVectorizer::default();
        let docs = documents();
        let batch = vectorizer.fit_transform(&docs).unwrap();
        for (doc, features) in docs.iter().zip(&batch) {
            assert_eq!(&vectorizer.transform(doc).unwrap(), features);
        }
    }
}
