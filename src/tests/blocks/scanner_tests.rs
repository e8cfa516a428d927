// Block scanner tests: reference scenarios, closing lines, and properties

use crate::blocks::{Query, scan, split_lines};
use crate::tests::helpers::{scan_source, spans};

const PYTHON: &str = "def f():\n    x = 1\n    y = 2\ndef g():\n    pass\n";

const NESTED: &str = "\
class A:
    def f(self):
        if x:
            return 1
        return 2
    def g(self):
        pass
class B:
    pass
";

#[test]
fn test_two_sibling_functions() {
    let blocks = scan_source(PYTHON, "^def", 0);
    assert_eq!(spans(&blocks), vec![(1, 3), (4, 5)]);
    assert_eq!(blocks[0].text(), "def f():\n    x = 1\n    y = 2");
}

#[test]
fn test_negative_offset_gives_single_line_blocks() {
    let blocks = scan_source(PYTHON, "^def", -1);
    assert_eq!(spans(&blocks), vec![(1, 1), (4, 4)]);
}

#[test]
fn test_blank_only_file_has_no_blocks() {
    // the empty pattern matches every line, blank ones included
    assert!(scan_source("\n\n   \n\t\n", "", 0).is_empty());
    assert!(scan_source("", "", 0).is_empty());
}

#[test]
fn test_closing_line_is_appended_to_multi_line_block() {
    let source = "fn main() {\n    let x = 1;\n}\n\nfn other() {}\n";
    let blocks = scan_source(source, "^fn main", 0);

    assert_eq!(spans(&blocks), vec![(1, 3)]);
    assert_eq!(blocks[0].lines()[2].text, "}");
}

#[test]
fn test_single_line_block_takes_no_closing_line() {
    let blocks = scan_source("let a = 1;\nlet b = 2;\n", "let a", 0);
    assert_eq!(spans(&blocks), vec![(1, 1)]);
}

#[test]
fn test_nested_anchor_is_absorbed_by_outer_block() {
    let source = "if a:\n    if b:\n        c\nd\n";
    let blocks = scan_source(source, "if", 0);
    assert_eq!(spans(&blocks), vec![(1, 4)]);
}

#[test]
fn test_blank_lines_inside_block_are_captured() {
    let source = "def f():\n    a\n\n    b\nx = 1\n";
    let blocks = scan_source(source, "^def", 0);

    assert_eq!(spans(&blocks), vec![(1, 5)]);
    assert_eq!(blocks[0].lines()[2].text, "");
}

#[test]
fn test_trailing_newline_adds_no_line() {
    let blocks = scan_source("def f():\n    a\n", "^def", 0);
    assert_eq!(spans(&blocks), vec![(1, 2)]);
}

#[test]
fn test_crlf_line_endings() {
    let blocks = scan_source("def f():\r\n    a\r\n", "^def", 0);
    assert_eq!(spans(&blocks), vec![(1, 2)]);
    assert_eq!(blocks[0].text(), "def f():\n    a");
}

#[test]
fn test_tab_indented_block() {
    let source = "func main() {\n\tif x {\n\t\ty()\n\t}\n}\n";
    let blocks = scan_source(source, "if x", 0);
    assert_eq!(spans(&blocks), vec![(2, 4)]);
}

#[test]
fn test_positive_offset_captures_siblings() {
    let blocks = scan_source(PYTHON, "^def f", 1);
    assert_eq!(spans(&blocks), vec![(1, 5)]);
}

#[test]
fn test_offset_is_counted_in_indentation_steps() {
    let ends: Vec<usize> = (-2..=2)
        .map(|offset| {
            let blocks = scan_source(NESTED, "def f", offset);
            assert_eq!(blocks.len(), 1, "offset {}", offset);
            blocks[0].line_end()
        })
        .collect();

    assert_eq!(ends, vec![2, 2, 6, 8, 9]);
}

#[test]
fn test_depth_monotonicity() {
    let mut previous = 0;
    for offset in -3..=3 {
        let blocks = scan_source(NESTED, "if x", offset);
        let len = blocks[0].len();
        assert!(len >= previous, "offset {} shrank the block", offset);
        previous = len;
    }
}

#[test]
fn test_block_properties_hold() {
    let lines = split_lines(NESTED);
    for anchor in ["def", "class", "return", "if", "pass"] {
        let query = Query::new(anchor, 0).unwrap();
        for block in scan(&lines, &query) {
            assert!(!block.lines().is_empty());
            assert!(query.anchor.is_match(&block.lines()[0].text));

            for pair in block.lines().windows(2) {
                assert_eq!(pair[1].number, pair[0].number + 1);
            }

            // joined text splits back into the exact source lines
            let joined = block.text();
            let rejoined: Vec<&str> = joined.split('\n').collect();
            let original: Vec<&str> = lines[block.line_start() - 1..block.line_end()]
                .iter()
                .map(String::as_str)
                .collect();
            assert_eq!(rejoined, original);
        }
    }
}

#[test]
fn test_scan_is_idempotent() {
    let query = Query::new("def|class", 0).unwrap();
    let lines = split_lines(NESTED);
    assert_eq!(scan(&lines, &query), scan(&lines, &query));
}

#[test]
fn test_blocks_never_overlap() {
    let blocks = scan_source(NESTED, "def|class|if|return", 0);
    for pair in blocks.windows(2) {
        assert!(pair[1].line_start() > pair[0].line_end());
    }
}

#[test]
fn test_invalid_anchor_is_rejected() {
    let err = Query::new("fn (", 0).unwrap_err();
    assert!(err.to_string().contains("invalid regex pattern"));
}

#[test]
fn test_extreme_offsets_do_not_overflow() {
    let source = "def f():\n    x\ndef g():\n    y\n";

    // the tightest offset leaves only the anchor lines
    assert_eq!(spans(&scan_source(source, "^def", i64::MIN)), vec![(1, 1), (3, 3)]);
    assert_eq!(spans(&scan_source(source, "^def", -1_000_000)), vec![(1, 1), (3, 3)]);

    // the loosest offset swallows the rest of the file
    assert_eq!(spans(&scan_source(source, "^def", i64::MAX)), vec![(1, 4)]);
}
