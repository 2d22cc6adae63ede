//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. Filters
//! rewrite its text or mark it as stopped; a [`TokenStream`] is the boxed
//! iterator passed between stages.
//!
//! # Examples
//!
//! ```
//! use disaster_response::analysis::token::Token;
//!
//! let token = Token::with_offsets("water", 1, 6, 11);
//! assert_eq!(token.text, "water");
//! assert_eq!(token.start_offset, 6);
//! assert!(!token.is_stopped());
//! ```

use serde::{Deserialize, Serialize};

/// A single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the filtered text
    pub start_offset: usize,

    /// The byte offset where this token ends in the filtered text
    pub end_offset: usize,

    /// Whether a filter marked this token for removal
    pub stopped: bool,
}

/// A stream of tokens flowing between analysis stages.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

impl Token {
    /// Create a new token without offsets.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Self::with_offsets(text, position, 0, 0)
    }

    /// Create a new token with byte offsets.
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
            stopped: false,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Return a copy of this token carrying new text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("shelter", 2);
        assert_eq!(token.text, "shelter");
        assert_eq!(token.position, 2);
        assert_eq!(token.len(), 7);
        assert!(!token.is_empty());
    }

    #[test]
    fn test_with_text_keeps_offsets() {
        let token = Token::with_offsets("Houses", 0, 4, 10).with_text("house");
        assert_eq!(token.text, "house");
        assert_eq!(token.start_offset, 4);
        assert_eq!(token.end_offset, 10);
    }

    #[test]
    fn test_stop() {
        let token = Token::new("  ", 0).stop();
        assert!(token.is_stopped());
    }
}
