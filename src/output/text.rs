//! Human-readable block rendering, optionally syntax highlighted

use std::path::Path;
use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use tracing::debug;

use crate::blocks::Block;

const THEME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_nonewlines)
}

fn theme() -> Option<&'static Theme> {
    let themes = &THEME_SET.get_or_init(ThemeSet::load_defaults).themes;
    themes.get(THEME).or_else(|| themes.values().next())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix every line with `filename:`
    pub filename_inline: bool,
    pub line_numbers: bool,
    pub colors: bool,
    /// Print the filename on its own line above each block
    pub filename_header: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            filename_inline: false,
            line_numbers: true,
            colors: false,
            filename_header: true,
        }
    }
}

impl FormatOptions {
    /// Settings used for tool responses: numbered, plain, with headers
    pub fn plain() -> Self {
        Self::default()
    }
}

/// `filename:` then `N:` prefixes, in that order
pub fn format_line(
    filename_inline: bool,
    filename: &str,
    line_numbers: bool,
    number: usize,
    text: &str,
) -> String {
    let mut line = String::with_capacity(text.len() + filename.len() + 8);
    if filename_inline {
        line.push_str(filename);
        line.push(':');
    }
    if line_numbers {
        line.push_str(&number.to_string());
        line.push(':');
    }
    line.push_str(text);
    line
}

/// Render one block, header included when enabled
pub fn format_block(block: &Block, filename: &str, options: &FormatOptions) -> String {
    let texts = if options.colors {
        highlight(block, filename)
    } else {
        block.lines().iter().map(|line| line.text.clone()).collect()
    };

    let mut out = Vec::with_capacity(block.len() + 1);
    if options.filename_header && !options.filename_inline {
        out.push(filename.to_string());
    }
    for (line, text) in block.lines().iter().zip(texts) {
        out.push(format_line(
            options.filename_inline,
            filename,
            options.line_numbers,
            line.number,
            &text,
        ));
    }
    out.join("\n")
}

/// Render all blocks of one file, separated by blank lines
pub fn format_blocks(blocks: &[Block], filename: &str, options: &FormatOptions) -> String {
    blocks
        .iter()
        .map(|block| format_block(block, filename, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Highlight line by line so prefixes can be added afterwards. Falls back to
/// the raw text when no theme or syntax is usable.
fn highlight(block: &Block, filename: &str) -> Vec<String> {
    let raw = || block.lines().iter().map(|line| line.text.clone()).collect();

    let Some(theme) = theme() else {
        return raw();
    };

    let syntaxes = syntax_set();
    let syntax = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| syntaxes.find_syntax_by_extension(ext))
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = Vec::with_capacity(block.len());
    for line in block.lines() {
        match highlighter.highlight_line(&line.text, syntaxes) {
            Ok(ranges) => out.push(format!("{}{}", as_24_bit_terminal_escaped(&ranges, false), RESET)),
            Err(err) => {
                debug!("syntax highlight failed for {}: {}", filename, err);
                return raw();
            }
        }
    }
    out
}
