//! Lemmatizing token filter.
//!
//! Reduces inflected nouns to their dictionary form (`"houses"` → `"house"`,
//! `"children"` → `"child"`). Unlike a stemmer the output is always a real
//! word form, which keeps vectorizer features readable.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for lemmatization algorithms.
pub trait Lemmatizer: Send + Sync {
    /// Reduce a word to its base form.
    fn lemmatize(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

/// Irregular plurals that no suffix rule can recover.
static IRREGULAR_NOUNS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("shelves", "shelf"),
        ("wolves", "wolf"),
        ("thieves", "thief"),
        ("loaves", "loaf"),
        ("data", "datum"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
    ])
});

/// Words that look inflected but are already in base form.
static INVARIANT_NOUNS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "news", "series", "species", "means", "clothes", "aids", "police", "people", "sheep",
        "physics", "politics", "diabetes", "measles", "headquarters", "specimen", "abdomen",
        "regimen", "acumen", "omen", "amen", "stamen",
    ]
});

/// Suffix substitutions, most specific first.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("zzes", "zz"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("ies", "y"),
    ("men", "man"),
    ("s", ""),
];

/// Rule-based noun lemmatizer modelled on WordNet's morphological detachment
/// rules, with an irregular-plural exception table.
#[derive(Debug, Clone, Default)]
pub struct NounLemmatizer;

impl NounLemmatizer {
    pub fn new() -> Self {
        NounLemmatizer
    }

    fn is_protected(word: &str) -> bool {
        word.chars().count() <= 3
            || !word.chars().all(char::is_alphabetic)
            || word.ends_with("ss")
            || word.ends_with("us")
            || word.ends_with("is")
            || INVARIANT_NOUNS.contains(&word)
    }
}

impl Lemmatizer for NounLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = IRREGULAR_NOUNS.get(word) {
            return lemma.to_string();
        }
        if Self::is_protected(word) {
            return word.to_string();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                // "ties" falls through to the plain "s" rule.
                if stem.chars().count() < 2 {
                    continue;
                }
                return format!("{stem}{replacement}");
            }
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "noun"
    }
}

/// Filter that applies lemmatization to tokens.
pub struct LemmaFilter {
    lemmatizer: Box<dyn Lemmatizer>,
}

impl std::fmt::Debug for LemmaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmaFilter")
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl LemmaFilter {
    /// Create a new lemma filter with the noun lemmatizer.
    pub fn new() -> Self {
        LemmaFilter {
            lemmatizer: Box::new(NounLemmatizer::new()),
        }
    }

    /// Create a lemma filter with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        LemmaFilter { lemmatizer }
    }
}

impl Default for LemmaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let lemma = self.lemmatizer.lemmatize(&token.text);
                    token.with_text(lemma)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}
