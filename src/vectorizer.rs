//! TF-IDF feature extraction.
//!
//! The vectorizer learns a [`Vocabulary`] (terms, stable indices and
//! smoothed inverse document frequencies) from training articles and maps
//! any text onto an L2-normalized sparse [`FeatureVector`] over that
//! vocabulary.
//!
//! # Example
//!
//! ```
//! use verity::vectorizer::TfIdfVectorizer;
//!
//! # fn main() -> verity::error::Result<()> {
//! let documents = vec![
//!     "senators reported the budget vote",
//!     "shocking secret cure doctors hide",
//!     "officials reported quarterly figures",
//! ];
//!
//! let mut vectorizer = TfIdfVectorizer::default();
//! vectorizer.fit(&documents)?;
//!
//! let features = vectorizer.transform("shocking budget")?;
//! assert_eq!(features.dim(), vectorizer.vocabulary()?.len());
//! assert!((features.norm() - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

mod sparse;
mod tfidf;
mod vocabulary;

pub use sparse::FeatureVector;
pub use tfidf::{TfIdfVectorizer, VectorizerConfig};
pub use vocabulary::Vocabulary;
