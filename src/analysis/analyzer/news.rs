//! The analyzer every trained artifact is built with.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (runs of Unicode letters and digits)
//! 2. LowercaseFilter
//! 3. LengthFilter (at least 2 characters)
//! 4. StopFilter (318 English stop words)
//!
//! # Examples
//!
//! ```
//! use verity::analysis::analyzer::{Analyzer, NewsAnalyzer};
//!
//! let analyzer = NewsAnalyzer::new().unwrap();
//! let terms = analyzer.terms("The Senate REPORTED a 2-vote margin.").unwrap();
//!
//! assert_eq!(terms, vec!["senate", "reported", "vote", "margin"]);
//! ```

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LengthFilter, LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// Minimum token length kept by the news analyzer.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Lowercasing, alphanumeric-splitting, stop-word-removing analyzer.
pub struct NewsAnalyzer {
    inner: PipelineAnalyzer,
}

impl NewsAnalyzer {
    /// Identity recorded in artifacts. Bump whenever the pipeline changes.
    pub const IDENTITY: &'static str = "news-v1";

    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(LengthFilter::new(MIN_TOKEN_CHARS)))
            .add_filter(Arc::new(StopFilter::new()))
            .with_name(Self::IDENTITY);

        Ok(Self { inner: analyzer })
    }
}

impl Default for NewsAnalyzer {
    fn default() -> Self {
        Self::new().expect("News analyzer should be creatable with default settings")
    }
}

impl Analyzer for NewsAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        Self::IDENTITY
    }
}

impl Debug for NewsAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
