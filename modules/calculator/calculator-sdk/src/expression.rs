//! Local expression evaluator.
//!
//! Recursive-descent parser over numeric literals, `+ - * /`, parentheses
//! and unary signs. Multiplication and division bind tighter than addition
//! and subtraction; operators of equal precedence associate to the left.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::evaluator::{self, EvalError, Operator};

/// Deepest nesting of parentheses and unary signs that is evaluated.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Expression parsing and evaluation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token at position {pos}")]
    UnexpectedToken { pos: usize },

    #[error("expression nested too deeply at position {pos}")]
    TooDeep { pos: usize },

    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Op(Operator),
    LParen,
    RParen,
}

/// Evaluate an arithmetic expression such as `"2 + 3 * (4 - 1) / 2"`.
///
/// The result is rounded like [`evaluator::evaluate`].
///
/// # Errors
/// Returns [`ExpressionError`] on malformed input, division by zero or overflow.
pub fn evaluate_expression(input: &str) -> Result<Decimal, ExpressionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some((_, pos)) = parser.peek() {
        return Err(ExpressionError::UnexpectedToken { pos });
    }
    Ok(evaluator::round_result(value))
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        text.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number = Decimal::from_str(&text)
                    .map_err(|_| ExpressionError::InvalidNumber { text, pos })?;
                tokens.push((Token::Number(number), pos));
            }
            '+' | '-' | '*' | '/' => {
                let op = Operator::from_symbol(ch.encode_utf8(&mut [0; 4]))?;
                tokens.push((Token::Op(op), pos));
                chars.next();
            }
            '(' => {
                tokens.push((Token::LParen, pos));
                chars.next();
            }
            ')' => {
                tokens.push((Token::RParen, pos));
                chars.next();
            }
            other => return Err(ExpressionError::UnexpectedChar { ch: other, pos }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.cursor).map(|(t, pos)| (t, *pos))
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.cursor).cloned();
        if item.is_some() {
            self.cursor += 1;
        }
        item
    }

    fn expr(&mut self) -> Result<Decimal, ExpressionError> {
        let mut value = self.term()?;
        while let Some((Token::Op(op @ (Operator::Add | Operator::Subtract)), _)) = self.peek() {
            let op = *op;
            self.cursor += 1;
            let rhs = self.term()?;
            value = evaluator::apply(value, rhs, op)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Decimal, ExpressionError> {
        let mut value = self.factor()?;
        while let Some((Token::Op(op @ (Operator::Multiply | Operator::Divide)), _)) = self.peek()
        {
            let op = *op;
            self.cursor += 1;
            let rhs = self.factor()?;
            value = evaluator::apply(value, rhs, op)?;
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<Decimal, ExpressionError> {
        match self.advance() {
            Some((Token::Number(n), _)) => Ok(n),
            Some((Token::Op(Operator::Subtract), pos)) => {
                self.nested(pos, |p| p.factor().map(|v| -v))
            }
            Some((Token::Op(Operator::Add), pos)) => self.nested(pos, Self::factor),
            Some((Token::LParen, pos)) => self.nested(pos, |p| {
                let value = p.expr()?;
                match p.advance() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((_, pos)) => Err(ExpressionError::UnexpectedToken { pos }),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }),
            Some((_, pos)) => Err(ExpressionError::UnexpectedToken { pos }),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn nested(
        &mut self,
        pos: usize,
        parse: impl FnOnce(&mut Self) -> Result<Decimal, ExpressionError>,
    ) -> Result<Decimal, ExpressionError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ExpressionError::TooDeep { pos });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }
}
