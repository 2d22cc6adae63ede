//! Whitespace trimming, the last normalization step before vectorizing.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Trims surrounding whitespace. A token with nothing left is stopped so a
/// later [`RemoveEmptyFilter`](super::RemoveEmptyFilter) drops it.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripFilter;

impl StripFilter {
    pub fn new() -> Self {
        StripFilter
    }
}

fn strip(token: Token) -> Token {
    if token.is_stopped() {
        return token;
    }
    match token.text.trim() {
        "" => token.stop(),
        trimmed if trimmed.len() < token.text.len() => token.with_text(trimmed),
        _ => token,
    }
}

impl Filter for StripFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(strip)))
    }

    fn name(&self) -> &'static str {
        "strip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_stops_blank_tokens() {
        let tokens = vec![
            Token::new(" water\t", 0),
            Token::new("food", 1),
            Token::new(" \n ", 2),
        ];

        let out: Vec<Token> = StripFilter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(out[0].text, "water");
        assert_eq!(out[1].text, "food");
        assert!(!out[1].is_stopped());
        assert!(out[2].is_stopped());
    }
}
