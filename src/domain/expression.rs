// SPDX-License-Identifier: MIT OR Apache-2.0

//! Combination expressions.
//!
//! A combined property computes its value from other properties with a small
//! expression language:
//!
//! - references: `${name}`
//! - literals: `42`, `3.5`, `1e3`, `'text'`, `"text"`, `true`, `false`
//! - unary: `-x`, `!x`
//! - binary, loosest to tightest: `||`, `&&`, `== !=`, `< <= > >=`, `+ -`, `* / %`
//!
//! `+` concatenates when either operand is text. Integer arithmetic is checked;
//! any floating operand promotes the operation to 64-bit floating point.

use crate::domain::typed_value::{Text, TypedValue};
use crate::domain::{PropertyName, TypeKind};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// A syntax error in an expression or template, with the byte offset it occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset into the source.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for SyntaxError {}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// A parsed combination expression.
///
/// # Examples
///
/// ```
/// use hexgen::domain::Expression;
///
/// let expr = Expression::parse("${myFloat} + 45402.0").unwrap();
/// let refs: Vec<&str> = expr.references().iter().map(|n| n.as_str()).collect();
/// assert_eq!(refs, ["myFloat"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A constant.
    Literal(TypedValue),
    /// The resolved value of another property.
    Reference(PropertyName),
    /// A unary operation.
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expression>,
    },
    /// A binary operation.
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expression>,
        /// Right operand
        rhs: Box<Expression>,
    },
}

impl Expression {
    /// Parses an expression.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: source.len(),
        };
        let expr = parser.parse_or()?;
        match parser.peek() {
            None => Ok(expr),
            Some((offset, token)) => Err(SyntaxError::new(
                *offset,
                format!("unexpected {}", token.describe()),
            )),
        }
    }

    /// Every property referenced by the expression, in order of first appearance.
    pub fn references(&self) -> Vec<&PropertyName> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a PropertyName>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Reference(name) => {
                if !out.contains(&name) {
                    out.push(name);
                }
            }
            Expression::Unary { operand, .. } => operand.collect_references(out),
            Expression::Binary { lhs, rhs, .. } => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
        }
    }

    /// Evaluates the expression, looking referenced values up through `lookup`.
    ///
    /// Fails with a message when a reference is missing or an operation is not
    /// defined for its operands.
    pub fn evaluate<'v, F>(&self, lookup: &F) -> Result<TypedValue, String>
    where
        F: Fn(&PropertyName) -> Option<&'v TypedValue>,
    {
        match self {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Reference(name) => lookup(name)
                .cloned()
                .ok_or_else(|| format!("'{}' has no value", name)),
            Expression::Unary { op, operand } => {
                let value = operand.evaluate(lookup)?;
                apply_unary(*op, value)
            }
            Expression::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(lookup)?;
                let rhs = rhs.evaluate(lookup)?;
                apply_binary(*op, lhs, rhs)
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(TypedValue::Text(text)) => write!(f, "{:?}", text.to_string()),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Reference(name) => write!(f, "${{{}}}", name),
            Expression::Unary { op: UnaryOp::Neg, operand } => write!(f, "-{}", operand),
            Expression::Unary { op: UnaryOp::Not, operand } => write!(f, "!{}", operand),
            Expression::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

/// Narrows an evaluated value to the kind declared for the combined property.
pub(crate) fn coerce_to_kind(value: TypedValue, kind: TypeKind) -> Result<TypedValue, String> {
    match kind {
        TypeKind::Boolean => match value {
            TypedValue::Bool(_) => Ok(value),
            other => Err(format!("expected a boolean result, got {}", describe(&other))),
        },
        TypeKind::Integer => match value {
            TypedValue::Int(_) => Ok(value),
            TypedValue::Float(_) | TypedValue::Double(_) => {
                let v = value.as_f64().unwrap_or(f64::NAN);
                // i64::MAX is not representable as f64; 2^63 is the first value out of range.
                if v.is_finite() && v.fract() == 0.0 && v >= -9_223_372_036_854_775_808.0 && v < 9_223_372_036_854_775_808.0 {
                    Ok(TypedValue::Int(v as i64))
                } else {
                    Err(format!("{} is not an integral value", v))
                }
            }
            other => Err(format!("expected a numeric result, got {}", describe(&other))),
        },
        TypeKind::Float => match value.as_f64() {
            Some(v) => {
                let narrowed = v as f32;
                if narrowed.is_finite() {
                    Ok(TypedValue::Float(narrowed))
                } else {
                    Err(format!("{} does not fit a 32-bit float", v))
                }
            }
            None => Err(format!("expected a numeric result, got {}", describe(&value))),
        },
        TypeKind::Double => match value.as_f64() {
            Some(v) if v.is_finite() => Ok(TypedValue::Double(v)),
            Some(v) => Err(format!("{} is not finite", v)),
            None => Err(format!("expected a numeric result, got {}", describe(&value))),
        },
        TypeKind::String | TypeKind::Regex => Ok(TypedValue::Text(value.stringify())),
    }
}

fn describe(value: &TypedValue) -> &'static str {
    match value {
        TypedValue::Bool(_) => "a boolean",
        TypedValue::Int(_) => "an integer",
        TypedValue::Float(_) | TypedValue::Double(_) => "a float",
        TypedValue::Text(_) => "text",
    }
}

fn finite(v: f64) -> Result<TypedValue, String> {
    if v.is_finite() {
        Ok(TypedValue::Double(v))
    } else {
        Err("result is not a finite number".to_string())
    }
}

fn apply_unary(op: UnaryOp, value: TypedValue) -> Result<TypedValue, String> {
    match (op, value) {
        (UnaryOp::Not, TypedValue::Bool(b)) => Ok(TypedValue::Bool(!b)),
        (UnaryOp::Neg, TypedValue::Int(i)) => i
            .checked_neg()
            .map(TypedValue::Int)
            .ok_or_else(|| "integer overflow".to_string()),
        (UnaryOp::Neg, TypedValue::Float(v)) => Ok(TypedValue::Float(-v)),
        (UnaryOp::Neg, TypedValue::Double(v)) => Ok(TypedValue::Double(-v)),
        (UnaryOp::Not, other) => Err(format!("'!' needs a boolean, got {}", describe(&other))),
        (UnaryOp::Neg, other) => Err(format!("'-' needs a number, got {}", describe(&other))),
    }
}

fn apply_binary(op: BinaryOp, lhs: TypedValue, rhs: TypedValue) -> Result<TypedValue, String> {
    use TypedValue::{Bool, Int, Text as T};

    match op {
        BinaryOp::Add if matches!(lhs, T(_)) || matches!(rhs, T(_)) => {
            let mut text = Text::new();
            text.append(&lhs.stringify());
            text.append(&rhs.stringify());
            Ok(T(text))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            match (&lhs, &rhs) {
                (Int(a), Int(b)) => integer_arithmetic(op, *a, *b),
                _ => match (lhs.as_f64(), rhs.as_f64()) {
                    (Some(a), Some(b)) => float_arithmetic(op, a, b),
                    _ => Err(format!(
                        "'{}' is not defined for {} and {}",
                        op.symbol(),
                        describe(&lhs),
                        describe(&rhs)
                    )),
                },
            }
        }
        BinaryOp::And | BinaryOp::Or => match (&lhs, &rhs) {
            (Bool(a), Bool(b)) => Ok(Bool(if op == BinaryOp::And { *a && *b } else { *a || *b })),
            _ => Err(format!(
                "'{}' needs booleans, got {} and {}",
                op.symbol(),
                describe(&lhs),
                describe(&rhs)
            )),
        },
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (&lhs, &rhs) {
                (Bool(a), Bool(b)) => a == b,
                (T(a), T(b)) => a == b,
                (Int(a), Int(b)) => a == b,
                _ => match (lhs.as_f64(), rhs.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => {
                        return Err(format!(
                            "cannot compare {} with {}",
                            describe(&lhs),
                            describe(&rhs)
                        ))
                    }
                },
            };
            Ok(Bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (&lhs, &rhs) {
                (Int(a), Int(b)) => Some(a.cmp(b)),
                (T(a), T(b)) => Some(a.to_string().cmp(&b.to_string())),
                _ => match (lhs.as_f64(), rhs.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => None,
                },
            };
            let ordering = ordering.ok_or_else(|| {
                format!("cannot order {} and {}", describe(&lhs), describe(&rhs))
            })?;
            let result = match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            };
            Ok(Bool(result))
        }
    }
}

fn integer_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<TypedValue, String> {
    let overflow = || "integer overflow".to_string();
    match op {
        BinaryOp::Add => a.checked_add(b).map(TypedValue::Int).ok_or_else(overflow),
        BinaryOp::Sub => a.checked_sub(b).map(TypedValue::Int).ok_or_else(overflow),
        BinaryOp::Mul => a.checked_mul(b).map(TypedValue::Int).ok_or_else(overflow),
        BinaryOp::Div => {
            if b == 0 {
                return Err("division by zero".to_string());
            }
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b).map(TypedValue::Int).ok_or_else(overflow),
                Some(_) => finite(a as f64 / b as f64),
                None => Err(overflow()),
            }
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err("division by zero".to_string());
            }
            a.checked_rem(b).map(TypedValue::Int).ok_or_else(overflow)
        }
        _ => Err(format!("'{}' is not arithmetic", op.symbol())),
    }
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> Result<TypedValue, String> {
    match op {
        BinaryOp::Add => finite(a + b),
        BinaryOp::Sub => finite(a - b),
        BinaryOp::Mul => finite(a * b),
        BinaryOp::Div | BinaryOp::Rem if b == 0.0 => Err("division by zero".to_string()),
        BinaryOp::Div => finite(a / b),
        BinaryOp::Rem => finite(a % b),
        _ => Err(format!("'{}' is not arithmetic", op.symbol())),
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Int(i64),
    Real(f64),
    Str(String),
    Ref(PropertyName),
    True,
    False,
    Op(&'static str),
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Int(i) => format!("number {}", i),
            Token::Real(v) => format!("number {}", v),
            Token::Str(_) => "string literal".to_string(),
            Token::Ref(name) => format!("reference ${{{}}}", name),
            Token::True => "'true'".to_string(),
            Token::False => "'false'".to_string(),
            Token::Op(op) => format!("'{}'", op),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

// Two-character operators come first so that `<=` is not read as `<`.
const OPERATORS: [&str; 16] = [
    "&&", "||", "==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "%", "!", "(", ")",
];

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch.is_ascii_digit() || (ch == '.' && next_is_digit(source, offset)) {
            tokens.push((offset, lex_number(source, &mut chars)?));
            continue;
        }
        if ch == '\'' || ch == '"' {
            tokens.push((offset, lex_string(source, &mut chars)?));
            continue;
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            let word = take_while(source, &mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
            let token = match word {
                "true" => Token::True,
                "false" => Token::False,
                other => {
                    return Err(SyntaxError::new(
                        offset,
                        format!("unexpected word '{}', references are written ${{{}}}", other, other),
                    ))
                }
            };
            tokens.push((offset, token));
            continue;
        }
        if ch == '$' {
            tokens.push((offset, lex_reference(source, &mut chars)?));
            continue;
        }

        let rest = &source[offset..];
        let op = OPERATORS
            .iter()
            .copied()
            .find(|op| rest.starts_with(op))
            .ok_or_else(|| SyntaxError::new(offset, format!("unexpected character '{}'", ch)))?;
        for _ in 0..op.chars().count() {
            chars.next();
        }
        let token = match op {
            "(" => Token::LParen,
            ")" => Token::RParen,
            other => Token::Op(other),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

fn next_is_digit(source: &str, offset: usize) -> bool {
    source[offset + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

fn take_while<'s>(
    source: &'s str,
    chars: &mut Peekable<CharIndices<'s>>,
    pred: impl Fn(char) -> bool,
) -> &'s str {
    let start = chars.peek().map(|(i, _)| *i).unwrap_or(source.len());
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !pred(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    &source[start..end]
}

fn lex_number(source: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, SyntaxError> {
    let start = chars.peek().map(|(i, _)| *i).unwrap_or(source.len());
    let mut end = start;
    let mut is_real = false;
    let mut prev = ' ';

    while let Some(&(i, c)) = chars.peek() {
        let accept = c.is_ascii_digit()
            || (c == '.' && !is_real)
            || c == 'e'
            || c == 'E'
            || ((c == '+' || c == '-') && (prev == 'e' || prev == 'E'));
        if !accept {
            break;
        }
        if c == '.' || c == 'e' || c == 'E' {
            is_real = true;
        }
        prev = c;
        end = i + 1;
        chars.next();
    }

    let lexeme = &source[start..end];
    if is_real {
        lexeme
            .parse::<f64>()
            .map(Token::Real)
            .map_err(|_| SyntaxError::new(start, format!("malformed number '{}'", lexeme)))
    } else {
        lexeme
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| SyntaxError::new(start, format!("integer '{}' is out of range", lexeme)))
    }
}

fn lex_string(source: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, SyntaxError> {
    let (start, quote) = chars.next().unwrap_or((source.len(), '\''));
    let mut value = String::new();

    loop {
        match chars.next() {
            None => return Err(SyntaxError::new(start, "unterminated string literal")),
            Some((_, c)) if c == quote => return Ok(Token::Str(value)),
            Some((i, '\\')) => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, c @ ('\\' | '\'' | '"'))) => value.push(c),
                Some((_, c)) => {
                    return Err(SyntaxError::new(i, format!("unknown escape '\\{}'", c)))
                }
                None => return Err(SyntaxError::new(start, "unterminated string literal")),
            },
            Some((_, c)) => value.push(c),
        }
    }
}

fn lex_reference<'s>(
    source: &'s str,
    chars: &mut Peekable<CharIndices<'s>>,
) -> Result<Token, SyntaxError> {
    let (start, _) = chars.next().unwrap_or((source.len(), '$'));
    match chars.next() {
        Some((_, '{')) => {}
        _ => return Err(SyntaxError::new(start, "expected '{' after '$'")),
    }
    let name = take_while(source, chars, |c| c != '}');
    match chars.next() {
        Some((_, '}')) => {}
        _ => return Err(SyntaxError::new(start, "unclosed reference")),
    }
    PropertyName::new(name.trim())
        .map(Token::Ref)
        .map_err(|_| SyntaxError::new(start, format!("'{}' is not a valid property name", name)))
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    fn peek_op(&self, candidates: &[&'static str]) -> Option<&'static str> {
        match self.peek() {
            Some((_, Token::Op(op))) if candidates.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn binary_level(
        &mut self,
        ops: &[&'static str],
        next: fn(&mut Self) -> Result<Expression, SyntaxError>,
    ) -> Result<Expression, SyntaxError> {
        let mut lhs = next(self)?;
        while let Some(op) = self.peek_op(ops) {
            self.pos += 1;
            let rhs = next(self)?;
            lhs = Expression::Binary {
                op: binary_op(op),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expression, SyntaxError> {
        self.binary_level(&["||"], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expression, SyntaxError> {
        self.binary_level(&["&&"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expression, SyntaxError> {
        self.binary_level(&["==", "!="], Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Expression, SyntaxError> {
        self.binary_level(&["<", "<=", ">", ">="], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Expression, SyntaxError> {
        self.binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, SyntaxError> {
        self.binary_level(&["*", "/", "%"], Self::parse_unary)
    }

    fn parse_unary(&mut self) -> Result<Expression, SyntaxError> {
        if let Some(op) = self.peek_op(&["-", "!"]) {
            self.pos += 1;
            let operand = self.parse_unary()?;
            let op = if op == "-" { UnaryOp::Neg } else { UnaryOp::Not };
            return Ok(Expression::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, SyntaxError> {
        let (offset, token) = match self.tokens.get(self.pos) {
            Some((offset, token)) => (*offset, token.clone()),
            None => return Err(SyntaxError::new(self.end, "unexpected end of expression")),
        };
        self.pos += 1;

        match token {
            Token::Int(i) => Ok(Expression::Literal(TypedValue::Int(i))),
            Token::Real(v) => Ok(Expression::Literal(TypedValue::Double(v))),
            Token::Str(s) => Ok(Expression::Literal(TypedValue::from(s))),
            Token::True => Ok(Expression::Literal(TypedValue::Bool(true))),
            Token::False => Ok(Expression::Literal(TypedValue::Bool(false))),
            Token::Ref(name) => Ok(Expression::Reference(name)),
            Token::LParen => {
                let inner = self.parse_or()?;
                match self.tokens.get(self.pos) {
                    Some((_, Token::RParen)) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(SyntaxError::new(offset, "unclosed '('")),
                }
            }
            other => Err(SyntaxError::new(offset, format!("unexpected {}", other.describe()))),
        }
    }
}

fn binary_op(symbol: &str) -> BinaryOp {
    match symbol {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Rem,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "&&" => BinaryOp::And,
        _ => BinaryOp::Or,
    }
}
