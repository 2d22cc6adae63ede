//! Analyzers combine a tokenizer with char filters and token filters.
//!
//! - [`PipelineAnalyzer`] - Custom tokenizer + filter chains
//! - [`MessageAnalyzer`] - The canonical normalization for disaster messages

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can be shared between
/// request handlers and rayon workers.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod message;
pub mod pipeline;

pub use message::MessageAnalyzer;
pub use pipeline::PipelineAnalyzer;
