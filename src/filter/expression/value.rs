//! awk value semantics: numbers, strings, and "strnums" (input-derived
//! strings that compare numerically when they look like numbers)

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    StrNum(String),
    /// Unset variable or missing field: `""` next to strings, `0` next to
    /// numbers
    Uninit,
}

impl Value {
    pub fn bool(b: bool) -> Self {
        Value::Num(if b { 1.0 } else { 0.0 })
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Num(n) => *n,
            Value::Str(s) | Value::StrNum(s) => numeric_prefix(s),
            Value::Uninit => 0.0,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Value::Num(n) => format_number(*n),
            Value::Str(s) | Value::StrNum(s) => s.clone(),
            Value::Uninit => String::new(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Num(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::StrNum(s) => match looks_numeric(s) {
                Some(n) => n != 0.0,
                None => !s.is_empty(),
            },
            Value::Uninit => false,
        }
    }

    fn as_comparable_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::StrNum(s) => looks_numeric(s),
            Value::Str(_) | Value::Uninit => None,
        }
    }

    /// Numeric comparison when both sides are numeric, string otherwise. An
    /// uninitialised side takes the form of the other.
    pub fn compare(&self, other: &Value) -> Ordering {
        let (lhs, rhs) = match (self, other) {
            (Value::Uninit, _) => (other.as_comparable_number().map(|_| 0.0), other.as_comparable_number()),
            (_, Value::Uninit) => (self.as_comparable_number(), self.as_comparable_number().map(|_| 0.0)),
            _ => (self.as_comparable_number(), other.as_comparable_number()),
        };
        match (lhs, rhs) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => self.to_text().cmp(&other.to_text()),
        }
    }
}

/// Full-string numeric check used for strnum comparisons
fn looks_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Longest leading numeric prefix, 0 when there is none ("3abc" -> 3)
fn numeric_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || &s[digits_start..end] == "." {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            end = exp;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// Integers print without a fraction; other numbers with up to six decimals
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e16 {
        return format!("{}", n as i64);
    }

    let text = format!("{:.6}", n);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
