//! Word tokenizer for free-form English messages.
//!
//! Splits text into words, numbers and single punctuation marks, and splits
//! English contractions off their host word the way treebank-style
//! tokenizers do (`"don't"` → `"do"`, `"n't"`; `"it's"` → `"it"`, `"'s"`).

use std::sync::LazyLock;

use regex::Regex;

use super::Tokenizer;
use super::regex::RegexTokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Decimal numbers, then words with optional apostrophe suffixes, then any
/// other single non-space character.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{N}+(?:[.,]\p{N}+)+|[\p{L}\p{N}_]+(?:['’]\p{L}+)*|\S")
        .expect("word pattern is valid")
});

/// Tokenizer producing word-level tokens with contractions split off.
#[derive(Clone, Debug)]
pub struct WordTokenizer {
    inner: RegexTokenizer,
}

impl WordTokenizer {
    pub fn new() -> Self {
        WordTokenizer {
            inner: RegexTokenizer::from_regex(WORD_PATTERN.clone()),
        }
    }

    /// Split a matched word at its contraction boundary, if any.
    fn split_contraction(token: &Token) -> Vec<(String, usize, usize)> {
        let text = &token.text;
        let start = token.start_offset;

        let Some(apostrophe) = text.find(['\'', '’']) else {
            return vec![(text.clone(), start, token.end_offset)];
        };
        if apostrophe == 0 {
            return vec![(text.clone(), start, token.end_offset)];
        }

        // "n't" binds to the negation, not to the host word.
        let split_at = if apostrophe > 1
            && text[..apostrophe].ends_with(['n', 'N'])
            && text[apostrophe..].chars().nth(1).is_some_and(|c| c.eq_ignore_ascii_case(&'t'))
        {
            apostrophe - 1
        } else {
            apostrophe
        };

        vec![
            (text[..split_at].to_string(), start, start + split_at),
            (text[split_at..].to_string(), start + split_at, token.end_offset),
        ]
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .inner
            .matches(text)
            .iter()
            .flat_map(Self::split_contraction)
            .enumerate()
            .map(|(position, (word, start, end))| Token::with_offsets(word, position, start, end))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        WordTokenizer::new()
            .tokenize(input)
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            texts("We need water, food!"),
            vec!["We", "need", "water", ",", "food", "!"]
        );
    }

    #[test]
    fn test_contractions() {
        assert_eq!(texts("don't"), vec!["do", "n't"]);
        assert_eq!(texts("It's late"), vec!["It", "'s", "late"]);
        assert_eq!(texts("we'll go"), vec!["we", "'ll", "go"]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("3.5 tons for 200 people"), vec!["3.5", "tons", "for", "200", "people"]);
    }

    #[test]
    fn test_offsets_and_positions() {
        let tokens: Vec<Token> = WordTokenizer::new().tokenize("can't stop").unwrap().collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "ca");
        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (0, 2));
        assert_eq!(tokens[1].text, "n't");
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (2, 5));
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(texts("").is_empty());
        assert!(texts("   ").is_empty());
    }
}
