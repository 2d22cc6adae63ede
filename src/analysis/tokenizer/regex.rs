//! Tokenizer that emits each regex match, with byte offsets.

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{DisasterError, Result};

/// A tokenizer that emits every match of a regular expression as a token.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    /// Tokenizer over runs of word characters (`\w+`).
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| DisasterError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(Self::from_regex(regex))
    }

    /// Create a tokenizer from an already compiled regex.
    pub fn from_regex(regex: Regex) -> Self {
        RegexTokenizer { pattern: regex }
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Collect the matches as tokens without boxing them into a stream.
    pub(crate) fn matches(&self, text: &str) -> Vec<Token> {
        self.pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(self.matches(text).into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_point_into_source() {
        let text = "tents for Leogane";
        let tokens: Vec<Token> = RegexTokenizer::new().unwrap().tokenize(text).unwrap().collect();

        let spans: Vec<(&str, usize)> = tokens
            .iter()
            .map(|t| (&text[t.start_offset..t.end_offset], t.position))
            .collect();
        assert_eq!(spans, vec![("tents", 0), ("for", 1), ("Leogane", 2)]);
    }

    #[test]
    fn test_custom_pattern_skips_digits() {
        let tokenizer = RegexTokenizer::with_pattern(r"[a-z]+").unwrap();
        let words: Vec<String> = tokenizer.tokenize("route 9 closed").unwrap().map(|t| t.text).collect();
        assert_eq!(words, vec!["route", "closed"]);
        assert_eq!(tokenizer.pattern(), "[a-z]+");
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(RegexTokenizer::with_pattern("(").is_err());
    }
}
