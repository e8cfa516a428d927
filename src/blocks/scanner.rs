//! Block scanner
//!
//! Single forward pass: every anchor match opens a block which then swallows
//! blank lines and lines indented past the capture threshold. Lines claimed by
//! a block are never revisited, so anchors nested inside a block are not
//! reported on their own.

use super::indentation::{Indentation, is_blank};
use super::{Block, Line, Query};

/// Split file contents into lines. A trailing newline does not produce an
/// extra empty line and a `\r` before each `\n` is dropped.
pub fn split_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.to_string())
        .collect()
}

/// Scan lines for blocks anchored at `query`
pub fn scan<S: AsRef<str>>(lines: &[S], query: &Query) -> Vec<Block> {
    let indentation = Indentation::infer(lines);
    scan_with(lines, query, indentation)
}

/// Scan with an already inferred indentation
pub fn scan_with<S: AsRef<str>>(lines: &[S], query: &Query, indentation: Indentation) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let text = lines[cursor].as_ref();
        if is_blank(text) || !query.anchor.is_match(text) {
            cursor += 1;
            continue;
        }

        let threshold = capture_threshold(indentation.level_of(text), query.depth_offset, indentation.width);

        let mut block = vec![Line {
            number: cursor + 1,
            text: text.to_string(),
        }];

        let mut next = cursor + 1;
        while next < lines.len() {
            let candidate = lines[next].as_ref();
            let captured = is_blank(candidate) || indentation.level_of(candidate) as i64 > threshold;

            if !captured {
                // closing line (`}`, `end`, ...) belongs to a multi-line block,
                // unless it opens the next block itself
                if block.len() > 1 && !query.anchor.is_match(candidate) {
                    block.push(Line {
                        number: next + 1,
                        text: candidate.to_string(),
                    });
                    next += 1;
                }
                break;
            }

            block.push(Line {
                number: next + 1,
                text: candidate.to_string(),
            });
            next += 1;
        }

        blocks.push(Block::new(block));
        cursor = next;
    }

    blocks
}

/// Lines strictly deeper than this level are part of the block. The offset is
/// counted in indentation steps; raising it lowers the threshold.
fn capture_threshold(anchor_level: usize, depth_offset: i64, width: usize) -> i64 {
    (anchor_level as i64).saturating_sub(depth_offset.saturating_mul(width as i64))
}
