// FilterEngine tests: combination policy, failures, identity

use crate::error::{BlockSearchError, Result};
use crate::filter::{
    ExpressionPredicate, FilterEngine, LineRegexPredicate, MatchPolicy, Predicate,
};
use crate::tests::helpers::{scan_source, spans};

const PYTHON: &str = "def f():\n    x = 1\n    y = 2\ndef g():\n    pass\n";

/// Always fails, to exercise failure reporting
struct Broken;

impl Predicate for Broken {
    fn describe(&self) -> String {
        "broken".to_string()
    }

    fn evaluate(&self, _block_text: &str) -> Result<bool> {
        Err(BlockSearchError::Evaluation("boom".to_string()))
    }
}

fn line_regex(pattern: &str) -> Box<dyn Predicate> {
    Box::new(LineRegexPredicate::new(pattern).unwrap())
}

fn expression(source: &str) -> Box<dyn Predicate> {
    Box::new(ExpressionPredicate::new(source).unwrap())
}

#[test]
fn test_line_regex_keeps_matching_block() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(vec![line_regex("y")], MatchPolicy::Any);

    let filtered = engine.apply(blocks);
    assert_eq!(spans(&filtered.blocks), vec![(1, 3)]);
    assert!(filtered.failures.is_empty());
}

#[test]
fn test_no_predicates_is_identity() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::default();

    assert!(engine.is_empty());
    let filtered = engine.apply(blocks.clone());
    assert_eq!(filtered.blocks, blocks);
}

#[test]
fn test_any_policy_keeps_block_when_one_matches() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(vec![line_regex("x ="), line_regex("pass")], MatchPolicy::Any);

    assert_eq!(spans(&engine.apply(blocks).blocks), vec![(1, 3), (4, 5)]);
}

#[test]
fn test_all_policy_requires_every_match() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(
        vec![line_regex("x ="), expression("NR == 3")],
        MatchPolicy::All,
    );

    assert_eq!(engine.policy(), MatchPolicy::All);
    assert_eq!(spans(&engine.apply(blocks).blocks), vec![(1, 3)]);

    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(vec![line_regex("x ="), line_regex("pass")], MatchPolicy::All);
    assert!(engine.apply(blocks).blocks.is_empty());
}

#[test]
fn test_line_regex_is_line_scoped() {
    // `^` anchors at each line, not only the block start
    let blocks = scan_source(PYTHON, "^def f", 0);
    let engine = FilterEngine::new(vec![line_regex("^    y")], MatchPolicy::Any);
    assert_eq!(engine.apply(blocks).blocks.len(), 1);
}

#[test]
fn test_failing_predicate_counts_as_non_match() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(vec![Box::new(Broken), line_regex("pass")], MatchPolicy::Any);

    let filtered = engine.apply(blocks);
    assert_eq!(spans(&filtered.blocks), vec![(4, 5)]);

    // one failure per block, every block still evaluated
    assert_eq!(filtered.failures.len(), 2);
    assert_eq!(filtered.failures[0].predicate, "broken");
    assert_eq!(filtered.failures[0].line_start, 1);
    assert_eq!(filtered.failures[1].line_start, 4);
}

#[test]
fn test_malformed_dynamic_regex_degrades_only_that_predicate() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(
        vec![expression("$0 ~ \"(\""), expression("/y = 2/")],
        MatchPolicy::Any,
    );

    let filtered = engine.apply(blocks);
    assert_eq!(spans(&filtered.blocks), vec![(1, 3)]);
    assert_eq!(filtered.failures.len(), 2);
    assert!(
        filtered
            .failures
            .iter()
            .all(|f| matches!(f.error, BlockSearchError::Evaluation(_)))
    );
}

#[test]
fn test_failing_predicate_under_all_policy_drops_block() {
    let blocks = scan_source(PYTHON, "^def", 0);
    let engine = FilterEngine::new(vec![Box::new(Broken), line_regex("def")], MatchPolicy::All);
    assert!(engine.apply(blocks).blocks.is_empty());
}

#[test]
fn test_surviving_blocks_keep_scan_order() {
    let source = "a:\n  1\nb:\n  2\nc:\n  3\n";
    let blocks = scan_source(source, ":$", 0);
    let engine = FilterEngine::new(vec![line_regex("[13]")], MatchPolicy::Any);

    assert_eq!(spans(&engine.apply(blocks).blocks), vec![(1, 2), (5, 6)]);
}

#[test]
fn test_policy_deserializes_lowercase() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        policy: MatchPolicy,
    }

    let all: Wrapper = toml::from_str("policy = \"all\"").unwrap();
    assert_eq!(all.policy, MatchPolicy::All);
    assert_eq!(MatchPolicy::default(), MatchPolicy::Any);
}
