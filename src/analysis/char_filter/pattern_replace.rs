use regex::Regex;

use super::CharFilter;
use crate::error::{DisasterError, Result};

/// A char filter that replaces every match of a regex pattern with a fixed string.
#[derive(Clone, Debug)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| DisasterError::analysis(format!("Invalid regex pattern: {e}")))?;
        Ok(Self::from_regex(pattern, replacement))
    }

    /// Create a filter from an already compiled regex.
    pub fn from_regex(pattern: Regex, replacement: &str) -> Self {
        Self {
            pattern,
            replacement: replacement.to_string(),
        }
    }

    /// Find every match of the pattern in `input`.
    pub fn find_all<'a>(&self, input: &'a str) -> Vec<&'a str> {
        self.pattern.find_iter(input).map(|m| m.as_str()).collect()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        // `replace_all` would expand `$name` groups inside the replacement.
        let mut output = String::with_capacity(input.len());
        let mut last_match_end = 0;

        for m in self.pattern.find_iter(input) {
            output.push_str(&input[last_match_end..m.start()]);
            output.push_str(&self.replacement);
            last_match_end = m.end();
        }

        output.push_str(&input[last_match_end..]);
        output
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_replace() {
        let filter = PatternReplaceCharFilter::new(r"\d+", "NUM").unwrap();
        assert_eq!(filter.filter("Year 2024"), "Year NUM");
    }

    #[test]
    fn test_remove_pattern() {
        let filter = PatternReplaceCharFilter::new(r"-", "").unwrap();
        assert_eq!(filter.filter("123-456-789"), "123456789");
    }

    #[test]
    fn test_replacement_is_literal() {
        let filter = PatternReplaceCharFilter::new(r"x", "$1").unwrap();
        assert_eq!(filter.filter("axb"), "a$1b");
    }

    #[test]
    fn test_find_all() {
        let filter = PatternReplaceCharFilter::new(r"[a-z]+\d", "").unwrap();
        assert_eq!(filter.find_all("ab1 cd2 ef"), vec!["ab1", "cd2"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternReplaceCharFilter::new(r"(", "").is_err());
    }
}
