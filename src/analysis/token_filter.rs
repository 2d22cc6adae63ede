//! Per-token transformations applied after tokenizing.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A stage that rewrites, marks or drops tokens.
pub trait Filter: Send + Sync {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Short identifier shown in pipeline debug output.
    fn name(&self) -> &'static str;
}

pub mod lemma;
pub mod lowercase;
pub mod remove_empty;
pub mod strip;

pub use lemma::{LemmaFilter, Lemmatizer, NounLemmatizer};
pub use lowercase::LowercaseFilter;
pub use remove_empty::RemoveEmptyFilter;
pub use strip::StripFilter;
