//! Text/binary classification from a leading byte window

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{BlockSearchError, Result};

pub const DEFAULT_SNIFF_BYTES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

/// NUL bytes mean binary; otherwise at least 80% of the window must be
/// printable ASCII, common whitespace, or non-ASCII (UTF-8) bytes.
pub fn classify(window: &[u8]) -> ContentKind {
    if window.is_empty() {
        return ContentKind::Text;
    }

    if window.contains(&0) {
        return ContentKind::Binary;
    }

    let printable = window
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13 || b == 12 || b >= 128)
        .count();

    if printable as f64 / window.len() as f64 >= 0.8 {
        ContentKind::Text
    } else {
        ContentKind::Binary
    }
}

/// Read up to `window` leading bytes of a file and classify them
pub fn sniff_file(path: &Path, window: usize) -> Result<ContentKind> {
    let mut file = File::open(path).map_err(|e| BlockSearchError::io(path, e))?;
    let mut buffer = Vec::with_capacity(window);
    file.by_ref()
        .take(window as u64)
        .read_to_end(&mut buffer)
        .map_err(|e| BlockSearchError::io(path, e))?;

    Ok(classify(&buffer))
}
