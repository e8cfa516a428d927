use regex::Regex;

use super::Predicate;
use crate::error::{BlockSearchError, Result};

/// Matches when any single line of the block matches the pattern
#[derive(Debug, Clone)]
pub struct LineRegexPredicate {
    pattern: Regex,
}

impl LineRegexPredicate {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| BlockSearchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }
}

impl Predicate for LineRegexPredicate {
    fn describe(&self) -> String {
        self.pattern.as_str().to_string()
    }

    fn evaluate(&self, block_text: &str) -> Result<bool> {
        Ok(block_text.split('\n').any(|line| self.pattern.is_match(line)))
    }
}
