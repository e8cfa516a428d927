//! Recursive-descent parser producing the condition AST
//!
//! Precedence, lowest first: `?:`, `||`, `&&`, `~ !~`, relational,
//! concatenation, `+ -`, `* / %`, unary `! - +`, `^`, `$`.

use regex::Regex;

use super::ParseError;
use super::lexer::{Spanned, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Length,
    ToLower,
    ToUpper,
    Index,
    Substr,
    Match,
}

impl Builtin {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "length" => Some(Builtin::Length),
            "tolower" => Some(Builtin::ToLower),
            "toupper" => Some(Builtin::ToUpper),
            "index" => Some(Builtin::Index),
            "substr" => Some(Builtin::Substr),
            "match" => Some(Builtin::Match),
            _ => None,
        }
    }

    fn arity(self) -> (usize, usize) {
        match self {
            Builtin::Length => (0, 1),
            Builtin::ToLower | Builtin::ToUpper => (1, 1),
            Builtin::Index | Builtin::Match => (2, 2),
            Builtin::Substr => (2, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Var {
    /// Number of lines in the block
    Nr,
    /// Number of whitespace-separated fields in the block
    Nf,
    Filename,
    /// Any other name; evaluates to the uninitialised value
    Unset(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Num(f64),
    Str(String),
    /// Regex literal; standing alone it means `$0 ~ /re/`
    Regex(Regex),
    Field(Box<Expr>),
    Var(Var),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Match {
        negated: bool,
        subject: Box<Expr>,
        pattern: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(Builtin, Vec<Expr>),
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end_offset: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end_offset: source_len,
        }
    }

    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.ternary()?;
        if let Some(extra) = self.tokens.get(self.pos) {
            return Err(ParseError::new(
                extra.offset,
                format!("unexpected {:?} after expression", extra.token),
            ));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.end_offset, |t| t.offset)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(ParseError::new(self.offset(), format!("expected {:?}", expected)))
        }
    }

    fn ternary(&mut self) -> Result<Expr, ParseError> {
        let condition = self.or()?;
        if !self.eat(&Token::Question) {
            return Ok(condition);
        }
        let then = self.ternary()?;
        self.expect(Token::Colon)?;
        let otherwise = self.ternary()?;
        Ok(Expr::Ternary(
            Box::new(condition),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and()?;
        while self.eat(&Token::OrOr) {
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.matching()?;
        while self.eat(&Token::AndAnd) {
            let rhs = self.matching()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn matching(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.relational()?;
        loop {
            let negated = match self.peek() {
                Some(Token::Tilde) => false,
                Some(Token::NotTilde) => true,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let pattern = self.relational()?;
            lhs = Expr::Match {
                negated,
                subject: Box::new(lhs),
                pattern: Box::new(pattern),
            };
        }
    }

    // relational operators do not chain
    fn relational(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.concatenation()?;
        let op = match self.peek() {
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::Ne) => BinaryOp::Ne,
            Some(Token::Ge) => BinaryOp::Ge,
            Some(Token::Gt) => BinaryOp::Gt,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.concatenation()?;
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn concatenation(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.additive()?;
        while matches!(
            self.peek(),
            Some(Token::Number(_) | Token::Str(_) | Token::Ident(_) | Token::Dollar | Token::LParen)
        ) {
            let rhs = self.additive()?;
            lhs = Expr::Binary(BinaryOp::Concat, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.power(),
        };
        self.pos += 1;
        let operand = self.unary()?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    // right-associative: 2^3^2 == 2^9
    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();
        let Some(spanned) = self.advance() else {
            return Err(ParseError::new(offset, "unexpected end of expression".to_string()));
        };

        match spanned.token {
            Token::Number(n) => Ok(Expr::Num(n)),
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::Regex(pattern) => Regex::new(&pattern)
                .map(Expr::Regex)
                .map_err(|e| ParseError::new(offset, format!("invalid regex /{}/: {}", pattern, e))),
            Token::Dollar => {
                let index = self.primary()?;
                Ok(Expr::Field(Box::new(index)))
            }
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => self.identifier(name, offset),
            other => Err(ParseError::new(offset, format!("unexpected {:?}", other))),
        }
    }

    fn identifier(&mut self, name: String, offset: usize) -> Result<Expr, ParseError> {
        if let Some(builtin) = Builtin::lookup(&name) {
            let args = if self.eat(&Token::LParen) {
                self.arguments()?
            } else if builtin == Builtin::Length {
                Vec::new()
            } else {
                return Err(ParseError::new(offset, format!("{} requires arguments", name)));
            };

            let (min, max) = builtin.arity();
            if args.len() < min || args.len() > max {
                return Err(ParseError::new(
                    offset,
                    format!("{} takes {}..={} arguments, got {}", name, min, max, args.len()),
                ));
            }
            return Ok(Expr::Call(builtin, args));
        }

        if self.peek() == Some(&Token::LParen) {
            return Err(ParseError::new(offset, format!("unknown function '{}'", name)));
        }

        let var = match name.as_str() {
            "NR" | "FNR" => Var::Nr,
            "NF" => Var::Nf,
            "FILENAME" => Var::Filename,
            _ => Var::Unset(name),
        };
        Ok(Expr::Var(var))
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.ternary()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(args);
        }
    }
}
