//! Drops tokens that carry no text.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Removes stopped and zero-length tokens so the vectorizer only counts
/// real words.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveEmptyFilter;

impl RemoveEmptyFilter {
    pub fn new() -> Self {
        RemoveEmptyFilter
    }
}

fn keep(token: &Token) -> bool {
    !(token.is_stopped() || token.is_empty())
}

impl Filter for RemoveEmptyFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(keep)))
    }

    fn name(&self) -> &'static str {
        "remove_empty"
    }
}
