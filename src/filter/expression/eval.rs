use regex::Regex;

use super::parser::{BinaryOp, Builtin, Expr, UnaryOp, Var};
use super::value::Value;
use crate::error::{BlockSearchError, Result};

/// The input record: the whole block bound as `$0`
pub struct Record<'a> {
    text: &'a str,
    fields: Vec<&'a str>,
    lines: usize,
}

impl<'a> Record<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            fields: text.split_whitespace().collect(),
            lines: text.split('\n').count(),
        }
    }

    fn field(&self, index: f64) -> Result<Value> {
        if index < 0.0 {
            return Err(BlockSearchError::Evaluation(format!(
                "trying to access out of range field {}",
                index
            )));
        }

        let index = index as usize;
        if index == 0 {
            return Ok(Value::StrNum(self.text.to_string()));
        }

        Ok(self
            .fields
            .get(index - 1)
            .map(|f| Value::StrNum(f.to_string()))
            .unwrap_or(Value::Uninit))
    }
}

pub fn evaluate(expr: &Expr, record: &Record) -> Result<Value> {
    match expr {
        Expr::Num(n) => Ok(Value::Num(*n)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Regex(regex) => Ok(Value::bool(regex.is_match(record.text))),
        Expr::Field(index) => {
            let index = evaluate(index, record)?.to_number();
            record.field(index)
        }
        Expr::Var(var) => Ok(match var {
            Var::Nr => Value::Num(record.lines as f64),
            Var::Nf => Value::Num(record.fields.len() as f64),
            Var::Filename => Value::Str(String::new()),
            Var::Unset(_) => Value::Uninit,
        }),
        Expr::Unary(op, operand) => {
            let value = evaluate(operand, record)?;
            Ok(match op {
                UnaryOp::Not => Value::bool(!value.is_truthy()),
                UnaryOp::Neg => Value::Num(-value.to_number()),
                UnaryOp::Plus => Value::Num(value.to_number()),
            })
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = evaluate(lhs, record)?;
            let rhs = evaluate(rhs, record)?;
            binary(*op, &lhs, &rhs)
        }
        Expr::Match {
            negated,
            subject,
            pattern,
        } => {
            let subject = evaluate(subject, record)?.to_text();
            let matched = with_pattern(pattern, record, |regex| regex.is_match(&subject))?;
            Ok(Value::bool(matched != *negated))
        }
        Expr::And(lhs, rhs) => {
            if !evaluate(lhs, record)?.is_truthy() {
                return Ok(Value::bool(false));
            }
            Ok(Value::bool(evaluate(rhs, record)?.is_truthy()))
        }
        Expr::Or(lhs, rhs) => {
            if evaluate(lhs, record)?.is_truthy() {
                return Ok(Value::bool(true));
            }
            Ok(Value::bool(evaluate(rhs, record)?.is_truthy()))
        }
        Expr::Ternary(condition, then, otherwise) => {
            if evaluate(condition, record)?.is_truthy() {
                evaluate(then, record)
            } else {
                evaluate(otherwise, record)
            }
        }
        Expr::Call(builtin, args) => call(*builtin, args, record),
    }
}

/// Run `f` against the pattern operand: a regex literal is used as compiled,
/// anything else is evaluated and compiled now.
fn with_pattern<T>(pattern: &Expr, record: &Record, f: impl FnOnce(&Regex) -> T) -> Result<T> {
    if let Expr::Regex(regex) = pattern {
        return Ok(f(regex));
    }

    let source = evaluate(pattern, record)?.to_text();
    let regex = Regex::new(&source).map_err(|e| {
        BlockSearchError::Evaluation(format!("invalid dynamic regex '{}': {}", source, e))
    })?;
    Ok(f(&regex))
}

fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    use std::cmp::Ordering;

    let value = match op {
        BinaryOp::Add => Value::Num(lhs.to_number() + rhs.to_number()),
        BinaryOp::Sub => Value::Num(lhs.to_number() - rhs.to_number()),
        BinaryOp::Mul => Value::Num(lhs.to_number() * rhs.to_number()),
        BinaryOp::Div => {
            let divisor = rhs.to_number();
            if divisor == 0.0 {
                return Err(BlockSearchError::Evaluation("division by zero".to_string()));
            }
            Value::Num(lhs.to_number() / divisor)
        }
        BinaryOp::Mod => {
            let divisor = rhs.to_number();
            if divisor == 0.0 {
                return Err(BlockSearchError::Evaluation(
                    "division by zero in %".to_string(),
                ));
            }
            Value::Num(lhs.to_number() % divisor)
        }
        BinaryOp::Pow => Value::Num(lhs.to_number().powf(rhs.to_number())),
        BinaryOp::Concat => Value::Str(lhs.to_text() + &rhs.to_text()),
        BinaryOp::Lt => Value::bool(lhs.compare(rhs) == Ordering::Less),
        BinaryOp::Le => Value::bool(lhs.compare(rhs) != Ordering::Greater),
        BinaryOp::Eq => Value::bool(lhs.compare(rhs) == Ordering::Equal),
        BinaryOp::Ne => Value::bool(lhs.compare(rhs) != Ordering::Equal),
        BinaryOp::Ge => Value::bool(lhs.compare(rhs) != Ordering::Less),
        BinaryOp::Gt => Value::bool(lhs.compare(rhs) == Ordering::Greater),
    };

    Ok(value)
}

fn call(builtin: Builtin, args: &[Expr], record: &Record) -> Result<Value> {
    match builtin {
        Builtin::Length => {
            let text = match args.first() {
                Some(arg) => evaluate(arg, record)?.to_text(),
                None => record.text.to_string(),
            };
            Ok(Value::Num(text.chars().count() as f64))
        }
        Builtin::ToLower => Ok(Value::Str(evaluate(&args[0], record)?.to_text().to_lowercase())),
        Builtin::ToUpper => Ok(Value::Str(evaluate(&args[0], record)?.to_text().to_uppercase())),
        Builtin::Index => {
            let haystack = evaluate(&args[0], record)?.to_text();
            let needle = evaluate(&args[1], record)?.to_text();
            let position = haystack
                .find(&needle)
                .map_or(0, |byte| haystack[..byte].chars().count() + 1);
            Ok(Value::Num(position as f64))
        }
        Builtin::Substr => {
            let text = evaluate(&args[0], record)?.to_text();
            let start = evaluate(&args[1], record)?.to_number();
            let length = match args.get(2) {
                Some(arg) => Some(evaluate(arg, record)?.to_number()),
                None => None,
            };
            Ok(Value::Str(substr(&text, start, length)))
        }
        Builtin::Match => {
            let text = evaluate(&args[0], record)?.to_text();
            let position = with_pattern(&args[1], record, |regex| {
                regex
                    .find(&text)
                    .map_or(0, |m| text[..m.start()].chars().count() + 1)
            })?;
            Ok(Value::Num(position as f64))
        }
    }
}

/// POSIX substr: characters at 1-based positions [start, start + length)
fn substr(text: &str, start: f64, length: Option<f64>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len() as f64;

    let first = start.round();
    let last = match length {
        Some(length) => first + length.round(),
        None => total + 1.0,
    };

    let from = first.max(1.0);
    let to = last.min(total + 1.0);
    if to <= from {
        return String::new();
    }

    chars[(from as usize - 1)..(to as usize - 1)].iter().collect()
}
