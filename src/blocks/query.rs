use regex::Regex;

use crate::error::{BlockSearchError, Result};

/// Anchor pattern plus depth offset, compiled once per run
#[derive(Debug, Clone)]
pub struct Query {
    pub anchor: Regex,
    pub depth_offset: i64,
}

impl Query {
    pub fn new(pattern: &str, depth_offset: i64) -> Result<Self> {
        let anchor = Regex::new(pattern).map_err(|source| BlockSearchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            anchor,
            depth_offset,
        })
    }

    pub fn pattern(&self) -> &str {
        self.anchor.as_str()
    }
}
