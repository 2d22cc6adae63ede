//! Case folding for message tokens.
//!
//! Messages arrive in every casing imaginable ("WATER", "Water", "water"),
//! so the vocabulary is built over folded text.
//!
//! ```
//! use disaster_response::analysis::token::Token;
//! use disaster_response::analysis::token_filter::Filter;
//! use disaster_response::analysis::token_filter::lowercase::LowercaseFilter;
//!
//! let tokens = vec![Token::new("Flood", 0), Token::new("WARNING", 1)];
//! let folded: Vec<String> = LowercaseFilter
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|token| token.text)
//!     .collect();
//!
//! assert_eq!(folded, vec!["flood", "warning"]);
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Folds token text to lowercase, leaving stopped tokens alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

fn fold(token: Token) -> Token {
    if token.is_stopped() || !token.text.chars().any(char::is_uppercase) {
        return token;
    }
    let folded = token.text.to_lowercase();
    token.with_text(folded)
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(fold)))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tokens: Vec<Token>) -> Vec<Token> {
        LowercaseFilter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect()
    }

    #[test]
    fn test_folds_mixed_case() {
        let out = run(vec![
            Token::new("Jacmel", 0),
            Token::new("URGENT", 1),
            Token::new("ÉVACUATION", 2),
            Token::new("tents", 3),
        ]);

        let texts: Vec<&str> = out.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["jacmel", "urgent", "évacuation", "tents"]);
        assert_eq!(out[1].position, 1);
    }

    #[test]
    fn test_stopped_token_is_untouched() {
        let out = run(vec![Token::new("SOS", 0).stop()]);
        assert_eq!(out[0].text, "SOS");
        assert!(out[0].is_stopped());
    }
}
