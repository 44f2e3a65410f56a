//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. Only the
//! token text ends up in the vocabulary; positions and offsets are kept so
//! that filters and tests can reason about where a term came from.
//!
//! # Examples
//!
//! ```
//! use verity::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 11);
//! ```

use std::fmt;

/// One term candidate cut from an article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Index among the tokens the tokenizer emitted (0-based).
    pub position: usize,
    /// Byte range of the token in the input text.
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Number of characters (not bytes) in the token text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text, keeping position and offsets.
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        Token {
            text: text.into(),
            ..self
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Tokens flowing between pipeline stages.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
