//! Tokenizer for the awk-style condition language

use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Regex(String),
    Ident(String),
    Dollar,
    LParen,
    RParen,
    Comma,
    Question,
    Colon,
    OrOr,
    AndAnd,
    Tilde,
    NotTilde,
    Lt,
    Le,
    EqEq,
    Ne,
    Ge,
    Gt,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
}

impl Token {
    /// Tokens after which `/` is division rather than the start of a regex
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Str(_) | Token::Regex(_) | Token::Ident(_) | Token::RParen
        )
    }
}

/// Token with the byte offset it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens: Vec<Spanned> = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let previous_ends_operand = tokens.last().is_some_and(|t| t.token.ends_operand());

        let token = match c {
            b'0'..=b'9' | b'.' => {
                let (number, end) = lex_number(source, pos)?;
                pos = end;
                Token::Number(number)
            }
            b'"' => {
                let (text, end) = lex_string(source, pos)?;
                pos = end;
                Token::Str(text)
            }
            b'/' if !previous_ends_operand => {
                let (pattern, end) = lex_regex(source, pos)?;
                pos = end;
                Token::Regex(pattern)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let end = source[pos..]
                    .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                    .map_or(source.len(), |n| pos + n);
                let ident = source[pos..end].to_string();
                pos = end;
                Token::Ident(ident)
            }
            _ => {
                let two = source.get(pos..pos + 2).unwrap_or("");
                let (token, width) = match two {
                    "||" => (Token::OrOr, 2),
                    "&&" => (Token::AndAnd, 2),
                    "!~" => (Token::NotTilde, 2),
                    "<=" => (Token::Le, 2),
                    ">=" => (Token::Ge, 2),
                    "==" => (Token::EqEq, 2),
                    "!=" => (Token::Ne, 2),
                    _ => match c {
                        b'$' => (Token::Dollar, 1),
                        b'(' => (Token::LParen, 1),
                        b')' => (Token::RParen, 1),
                        b',' => (Token::Comma, 1),
                        b'?' => (Token::Question, 1),
                        b':' => (Token::Colon, 1),
                        b'~' => (Token::Tilde, 1),
                        b'<' => (Token::Lt, 1),
                        b'>' => (Token::Gt, 1),
                        b'+' => (Token::Plus, 1),
                        b'-' => (Token::Minus, 1),
                        b'*' => (Token::Star, 1),
                        b'/' => (Token::Slash, 1),
                        b'%' => (Token::Percent, 1),
                        b'^' => (Token::Caret, 1),
                        b'!' => (Token::Bang, 1),
                        _ => {
                            let ch = source[pos..].chars().next().unwrap_or('?');
                            return Err(ParseError::new(pos, format!("unexpected character '{}'", ch)));
                        }
                    },
                };
                pos += width;
                token
            }
        };

        tokens.push(Spanned {
            token,
            offset: start,
        });
    }

    Ok(tokens)
}

fn lex_number(source: &str, start: usize) -> Result<(f64, usize), ParseError> {
    let bytes = source.as_bytes();
    let mut end = start;

    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }

    // exponent, only when digits follow
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

    source[start..end]
        .parse::<f64>()
        .map(|n| (n, end))
        .map_err(|_| ParseError::new(start, format!("invalid number '{}'", &source[start..end])))
}

fn lex_string(source: &str, start: usize) -> Result<(String, usize), ParseError> {
    let mut text = String::new();
    let mut chars = source[start + 1..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((text, start + 1 + i + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, other)) => text.push(other),
                None => break,
            },
            _ => text.push(c),
        }
    }

    Err(ParseError::new(start, "unterminated string".to_string()))
}

fn lex_regex(source: &str, start: usize) -> Result<(String, usize), ParseError> {
    let mut pattern = String::new();
    let mut chars = source[start + 1..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '/' => return Ok((pattern, start + 1 + i + 1)),
            '\\' => match chars.next() {
                Some((_, '/')) => pattern.push('/'),
                Some((_, other)) => {
                    pattern.push('\\');
                    pattern.push(other);
                }
                None => break,
            },
            '\n' => break,
            _ => pattern.push(c),
        }
    }

    Err(ParseError::new(start, "unterminated regex".to_string()))
}
