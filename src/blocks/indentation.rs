//! Indentation inference
//!
//! Each file is assumed to indent with a single character (space or tab). The
//! unit and the width of one nesting step are decided once from the first
//! indented line and then passed by value into every level computation.

/// Whitespace unit used by a file and the width of one nesting step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indentation {
    pub unit: char,
    pub width: usize,
}

impl Default for Indentation {
    fn default() -> Self {
        Self {
            unit: ' ',
            width: 1,
        }
    }
}

impl Indentation {
    /// Infer the indentation from the first non-blank line that begins with
    /// whitespace. Files without indentation are modeled as single-space.
    pub fn infer<S: AsRef<str>>(lines: &[S]) -> Self {
        for line in lines {
            let line = line.as_ref();
            if is_blank(line) {
                continue;
            }

            let unit = match line.chars().next() {
                Some('\t') => '\t',
                Some(' ') => ' ',
                _ => continue,
            };

            let width = line.chars().take_while(|&c| c == unit).count();
            return Self { unit, width };
        }

        Self::default()
    }

    /// Number of leading unit characters. A line made only of unit
    /// characters is level 0 so it never looks deeper than real content.
    pub fn level_of(&self, line: &str) -> usize {
        let mut level = 0;
        for c in line.chars() {
            if c != self.unit {
                return level;
            }
            level += 1;
        }

        0
    }
}

/// Empty or whitespace-only
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}
