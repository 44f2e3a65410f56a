//! Length filter implementation.

use super::Filter;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A filter that drops tokens shorter than a minimum number of characters.
///
/// Length is measured in Unicode scalar values, not bytes, so `"é"` is one
/// character long.
#[derive(Clone, Debug)]
pub struct LengthFilter {
    min_chars: usize,
}

impl LengthFilter {
    /// Create a new length filter keeping tokens of at least `min_chars` characters.
    pub fn new(min_chars: usize) -> Self {
        LengthFilter { min_chars }
    }

    /// Get the minimum length.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }
}

impl Filter for LengthFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let min_chars = self.min_chars;
        Ok(Box::new(
            tokens.filter(move |token| token.char_len() >= min_chars),
        ))
    }

    fn name(&self) -> &'static str {
        "length"
    }
}
