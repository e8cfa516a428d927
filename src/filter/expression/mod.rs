//! In-process awk-style conditions
//!
//! Supports the part of awk that makes sense as a single condition over one
//! record: regex literals (`/TODO/`), `$0`/`$N` fields, `NR` (lines in the
//! block), `NF`, `length`, string builtins, arithmetic, comparisons, `~`/`!~`,
//! boolean operators and `?:`. The block's joined text is the record.
//!
//! ```
//! use blocksearch::filter::{ExpressionPredicate, Predicate};
//!
//! let predicate = ExpressionPredicate::new("/return/ && NR > 2").unwrap();
//! assert!(predicate.evaluate("fn f() {\n    return 1;\n}").unwrap());
//! assert!(!predicate.evaluate("fn g() {}").unwrap());
//! ```

mod eval;
mod lexer;
mod parser;
mod value;

pub use eval::Record;
pub use parser::Expr;
pub use value::Value;

use super::Predicate;
use crate::error::{BlockSearchError, Result};

/// Syntax error with the byte offset it was found at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(position: usize, message: String) -> Self {
        Self { position, message }
    }
}

/// Parse a condition. An empty (or whitespace-only) condition is always true.
pub fn parse(source: &str) -> Result<Expr> {
    let to_error = |e: ParseError| BlockSearchError::InvalidExpression {
        expression: source.to_string(),
        position: e.position,
        message: e.message,
    };

    if source.trim().is_empty() {
        return Ok(Expr::Num(1.0));
    }

    let tokens = lexer::tokenize(source).map_err(to_error)?;
    parser::Parser::new(tokens, source.len())
        .parse()
        .map_err(to_error)
}

/// Evaluate a parsed condition against a record text
pub fn evaluate(expr: &Expr, text: &str) -> Result<Value> {
    eval::evaluate(expr, &Record::new(text))
}

/// Record-level predicate evaluated in-process
#[derive(Debug, Clone)]
pub struct ExpressionPredicate {
    source: String,
    expr: Expr,
}

impl ExpressionPredicate {
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            expr: parse(source)?,
        })
    }
}

impl Predicate for ExpressionPredicate {
    fn describe(&self) -> String {
        self.source.clone()
    }

    fn evaluate(&self, block_text: &str) -> Result<bool> {
        Ok(evaluate(&self.expr, block_text)?.is_truthy())
    }
}
