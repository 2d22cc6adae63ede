//! Composable analysis pipeline.
//!
//! Text passes through every char filter, then the tokenizer, then each
//! token filter in insertion order.
//!
//! ```
//! use std::sync::Arc;
//!
//! use disaster_response::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//! use disaster_response::analysis::token_filter::LowercaseFilter;
//! use disaster_response::analysis::tokenizer::RegexTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
//!     .add_filter(Arc::new(LowercaseFilter::new()));
//!
//! let words: Vec<String> = analyzer
//!     .analyze("Need WATER now")
//!     .unwrap()
//!     .map(|token| token.text)
//!     .collect();
//! assert_eq!(words, vec!["need", "water", "now"]);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::char_filter::CharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer wrapped by optional char filters and token filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    char_filters: Vec<Arc<dyn CharFilter>>,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            char_filters: Vec::new(),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Append a filter that rewrites the raw text before tokenizing.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Append a token filter; filters run in the order they are added.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Names of every stage, in execution order.
    pub fn stages(&self) -> Vec<&'static str> {
        self.char_filters
            .iter()
            .map(|c| c.name())
            .chain(std::iter::once(self.tokenizer.name()))
            .chain(self.filters.iter().map(|f| f.name()))
            .collect()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let text = self
            .char_filters
            .iter()
            .fold(Cow::Borrowed(text), |acc, c| Cow::Owned(c.filter(&acc)));

        self.filters
            .iter()
            .try_fold(self.tokenizer.tokenize(&text)?, |tokens, f| f.filter(tokens))
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PipelineAnalyzer").field(&self.stages()).finish()
    }
}
