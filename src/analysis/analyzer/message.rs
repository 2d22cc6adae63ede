//! Canonical text normalization for disaster messages.
//!
//! Training and serving both tokenize through [`MessageAnalyzer`]:
//!
//! 1. URL-shaped substrings are replaced by [`URL_PLACEHOLDER`]
//! 2. the text is split into word tokens (contractions split off)
//! 3. each token is lowercased
//! 4. each token is lemmatized to its base noun form
//! 5. surrounding whitespace is stripped and empty tokens dropped
//!
//! # Examples
//!
//! ```
//! use disaster_response::analysis::analyzer::MessageAnalyzer;
//!
//! let analyzer = MessageAnalyzer::new();
//! let tokens = analyzer.tokenize("Families need TENTS, see http://relief.org").unwrap();
//! assert_eq!(tokens, vec!["family", "need", "tent", ",", "see", "url_placeholder"]);
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::char_filter::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LemmaFilter, LowercaseFilter, RemoveEmptyFilter, StripFilter};
use crate::analysis::tokenizer::WordTokenizer;
use crate::error::Result;

/// Token substituted for every detected URL.
pub const URL_PLACEHOLDER: &str = "url_placeholder";

/// Pattern for URL-shaped substrings.
pub const URL_PATTERN: &str =
    r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+";

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(URL_PATTERN).expect("URL pattern is valid"));

/// The analyzer shared by the vectorizer at training time and the web
/// handlers at prediction time.
#[derive(Clone)]
pub struct MessageAnalyzer {
    urls: PatternReplaceCharFilter,
    inner: PipelineAnalyzer,
}

impl MessageAnalyzer {
    pub fn new() -> Self {
        let urls = PatternReplaceCharFilter::from_regex(URL_REGEX.clone(), URL_PLACEHOLDER);
        let inner = PipelineAnalyzer::new(Arc::new(WordTokenizer::new()))
            .add_char_filter(Arc::new(urls.clone()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(LemmaFilter::new()))
            .add_filter(Arc::new(StripFilter::new()))
            .add_filter(Arc::new(RemoveEmptyFilter::new()));

        MessageAnalyzer { urls, inner }
    }

    /// Return the URLs found in `text`, in order of appearance.
    pub fn detect_urls<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.urls.find_all(text)
    }

    /// Analyze `text` and collect the normalized token texts.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

impl Default for MessageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for MessageAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "message"
    }
}

impl std::fmt::Debug for MessageAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
