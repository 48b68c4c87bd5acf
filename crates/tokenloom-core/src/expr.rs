//! Reference and arithmetic parsing
//!
//! Token values can embed references to other tokens:
//!
//! ```text
//! {color.brand.primary}            single reference
//! 1px solid {color.border}         references inside text
//! {space.base} * 2 + 4px           arithmetic over references and literals
//! ```
//!
//! [`parse_template`] splits a value into text and reference segments.
//! [`parse_expression`] builds an expression tree when the whole value is
//! arithmetic. Units on numeric literals are stripped before evaluation and
//! are not reattached.

use serde_json::Value;

use crate::error::{Error, Result};

/// A piece of a value string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Text(String),
    /// `{path}` reference, stored without braces
    Ref(String),
}

/// A value string split into text and references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Segments in source order
    pub segments: Vec<Segment>,
}

impl Template {
    /// Referenced paths in source order
    pub fn references(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Ref(path) => Some(path.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Whether any segment is a reference
    pub fn has_references(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Ref(_)))
    }

    /// The path if the value is exactly one reference, ignoring surrounding whitespace
    pub fn single_reference(&self) -> Option<&str> {
        let mut found = None;
        for segment in &self.segments {
            match segment {
                Segment::Ref(path) if found.is_none() => found = Some(path.as_str()),
                Segment::Ref(_) => return None,
                Segment::Text(text) if text.trim().is_empty() => {}
                Segment::Text(_) => return None,
            }
        }
        found
    }
}

/// Split a value string into text and reference segments.
///
/// An unmatched `{` is kept as text.
pub fn parse_template(input: &str) -> Template {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']).filter(|&i| after.as_bytes()[i] == b'}') else {
            text.push_str(&rest[..=open]);
            rest = after;
            continue;
        };

        let path = after[..close].trim();
        if path.is_empty() {
            text.push_str(&rest[..open + close + 2]);
        } else {
            text.push_str(&rest[..open]);
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Ref(path.to_string()));
        }
        rest = &after[close + 1..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Template { segments }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Arithmetic expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal, unit already stripped
    Number(f64),
    /// Reference to another token
    Ref(String),
    /// Unary minus
    Neg(Box<Expr>),
    /// Binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Whether the tree contains a binary operator
    pub fn has_operator(&self) -> bool {
        match self {
            Self::Number(_) | Self::Ref(_) => false,
            Self::Neg(inner) => inner.has_operator(),
            Self::Binary { .. } => true,
        }
    }

    /// Evaluate with standard precedence. `lookup` turns a referenced path into a number.
    pub fn evaluate(&self, token: &str, lookup: &mut dyn FnMut(&str) -> Result<f64>) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Ref(path) => lookup(path),
            Self::Neg(inner) => Ok(-inner.evaluate(token, lookup)?),
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate(token, lookup)?;
                let r = rhs.evaluate(token, lookup)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div if r == 0.0 => Err(Error::InvalidExpression {
                        token: token.to_string(),
                        message: "division by zero".to_string(),
                    }),
                    BinaryOp::Div => Ok(l / r),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Number(f64),
    Ref(String),
    Op(char),
    Open,
    Close,
}

fn lex(input: &str) -> Option<Vec<Lexeme>> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' => {
                out.push(Lexeme::Op(c));
                chars.next();
            }
            '(' => {
                out.push(Lexeme::Open);
                chars.next();
            }
            ')' => {
                out.push(Lexeme::Close);
                chars.next();
            }
            '{' => {
                let close = input[start..].find('}')? + start;
                let path = input[start + 1..close].trim();
                if path.is_empty() || path.contains('{') {
                    return None;
                }
                out.push(Lexeme::Ref(path.to_string()));
                while chars.peek().is_some_and(|&(i, _)| i <= close) {
                    chars.next();
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' || d.is_ascii_alphabetic() || d == '%' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let dimension = parse_dimension(&input[start..end])?;
                out.push(Lexeme::Number(dimension.value));
            }
            _ => return None,
        }
    }

    Some(out)
}

struct ExprParser {
    lexemes: Vec<Lexeme>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        self.pos += 1;
        lexeme
    }

    fn expression(&mut self) -> Option<Expr> {
        let mut lhs = self.term()?;
        while let Some(Lexeme::Op(c @ ('+' | '-'))) = self.peek() {
            let op = if *c == '+' { BinaryOp::Add } else { BinaryOp::Sub };
            self.bump();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Some(lhs)
    }

    fn term(&mut self) -> Option<Expr> {
        let mut lhs = self.unary()?;
        while let Some(Lexeme::Op(c @ ('*' | '/'))) = self.peek() {
            let op = if *c == '*' { BinaryOp::Mul } else { BinaryOp::Div };
            self.bump();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Some(lhs)
    }

    fn unary(&mut self) -> Option<Expr> {
        if let Some(Lexeme::Op('-')) = self.peek() {
            self.bump();
            return Some(Expr::Neg(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<Expr> {
        match self.bump()? {
            Lexeme::Number(n) => Some(Expr::Number(n)),
            Lexeme::Ref(path) => Some(Expr::Ref(path)),
            Lexeme::Open => {
                let inner = self.expression()?;
                match self.bump()? {
                    Lexeme::Close => Some(inner),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Parse a whole value string as an arithmetic expression.
///
/// Returns `None` when any part of the string is not arithmetic.
pub fn parse_expression(input: &str) -> Option<Expr> {
    let lexemes = lex(input)?;
    if lexemes.is_empty() {
        return None;
    }
    let mut parser = ExprParser { lexemes, pos: 0 };
    let expr = parser.expression()?;
    (parser.pos == parser.lexemes.len()).then_some(expr)
}

/// A number with an optional unit suffix, e.g. `16px`, `1.5`, `50%`
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Numeric part
    pub value: f64,
    /// Unit suffix, empty when unitless
    pub unit: String,
}

/// Parse `<number><unit>` where the unit is letters or `%`
pub fn parse_dimension(input: &str) -> Option<Dimension> {
    let input = input.trim();
    let split = input
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    if number.is_empty() || !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    value.is_finite().then(|| Dimension {
        value,
        unit: unit.to_string(),
    })
}

/// Numeric reading of a JSON value, units stripped
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_dimension(s).map(|d| d.value),
        _ => None,
    }
}

/// JSON number for an arithmetic result; whole numbers become integers
pub fn number_value(n: f64) -> Value {
    let rounded = (n * 1e10).round() / 1e10;
    if rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
        Value::from(rounded as i64)
    } else {
        serde_json::Number::from_f64(rounded)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Text form of a value, as substituted into surrounding text
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
