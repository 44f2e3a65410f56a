//! Text analysis for news articles.
//!
//! This module turns raw article text into the term stream the TF-IDF
//! vectorizer counts. It follows the classic analysis pipeline layout:
//! a [`Tokenizer`] splits text, then [`Filter`]s normalize and prune the
//! tokens, and an [`Analyzer`] ties both together.
//!
//! The [`NewsAnalyzer`] is the pipeline used for every trained artifact. Its
//! behavior is part of the vocabulary identity, so any change to it must
//! come with a new [`NewsAnalyzer::IDENTITY`].

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, NewsAnalyzer, PipelineAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::{Filter, LengthFilter, LowercaseFilter, StopFilter};
pub use tokenizer::{RegexTokenizer, Tokenizer};
