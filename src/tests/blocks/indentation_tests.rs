// Indentation inference and level tests

use crate::blocks::Indentation;
use crate::blocks::indentation::is_blank;

#[test]
fn test_infer_spaces_from_first_indented_line() {
    let lines = ["def f():", "", "    x = 1", "        y = 2"];
    let indentation = Indentation::infer(&lines);

    assert_eq!(indentation.unit, ' ');
    assert_eq!(indentation.width, 4);
}

#[test]
fn test_infer_tabs() {
    let lines = ["func main() {", "\tfmt.Println()", "}"];
    let indentation = Indentation::infer(&lines);

    assert_eq!(indentation.unit, '\t');
    assert_eq!(indentation.width, 1);
}

#[test]
fn test_infer_skips_whitespace_only_lines() {
    // a line of spaces alone must not decide the unit
    let lines = ["   ", "a:", "\tb"];
    let indentation = Indentation::infer(&lines);

    assert_eq!(indentation.unit, '\t');
}

#[test]
fn test_infer_defaults_without_indentation() {
    let lines = ["a", "b", "", "c"];
    assert_eq!(Indentation::infer(&lines), Indentation::default());
    assert_eq!(Indentation::infer::<&str>(&[]), Indentation { unit: ' ', width: 1 });
}

#[test]
fn test_level_counts_leading_units_only() {
    let spaces = Indentation { unit: ' ', width: 2 };
    assert_eq!(spaces.level_of("x"), 0);
    assert_eq!(spaces.level_of("  x"), 2);
    assert_eq!(spaces.level_of("    x  y"), 4);
    // a tab is not the unit, so it stops the count
    assert_eq!(spaces.level_of("\t  x"), 0);
    assert_eq!(spaces.level_of("  \tx"), 2);
}

#[test]
fn test_level_of_whitespace_only_line_is_zero() {
    let tabs = Indentation { unit: '\t', width: 1 };
    assert_eq!(tabs.level_of("\t\t\t"), 0);
    assert_eq!(tabs.level_of(""), 0);
}

#[test]
fn test_is_blank() {
    assert!(is_blank(""));
    assert!(is_blank("   "));
    assert!(is_blank(" \t "));
    assert!(!is_blank("  x"));
}
