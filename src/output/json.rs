use serde::{Deserialize, Serialize};

use crate::blocks::Block;
use crate::error::Result;

/// Wire form of one block, one JSON object per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExport {
    pub filename: String,
    pub line_start: usize,
    pub line_end: usize,
    pub text: String,
}

impl BlockExport {
    pub fn new(filename: &str, block: &Block) -> Self {
        Self {
            filename: filename.to_string(),
            line_start: block.line_start(),
            line_end: block.line_end(),
            text: block.text(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Newline-delimited JSON for every block of a file
pub fn encode_blocks(blocks: &[Block], filename: &str) -> Result<String> {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&BlockExport::new(filename, block).to_json()?);
        out.push('\n');
    }
    Ok(out)
}
