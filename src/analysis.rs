//! Text analysis for disaster messages.
//!
//! This module turns raw message text into the normalized token sequence fed
//! to the count vectorizer. Analysis runs in three stages:
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Token Filters → Tokens
//! ```
//!
//! [`analyzer::MessageAnalyzer`] is the single canonical pipeline used by both
//! training and serving, so a model never sees tokens produced differently
//! from the ones it was fitted on.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
