//! Arithmetic evaluator shared by the server and the client.
//!
//! Operands and results are `Decimal` values. Stored history uses
//! `decimal(15, 8)`, so results are rounded to [`RESULT_SCALE`] fractional
//! digits before they leave [`evaluate`], and anything with more than
//! [`MAX_INTEGER_DIGITS`] integer digits is rejected.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits kept in a calculation result.
pub const RESULT_SCALE: u32 = 8;

/// Integer digits that fit the stored `decimal(15, 8)` columns.
pub const MAX_INTEGER_DIGITS: u32 = 7;

/// Smallest magnitude that no longer fits: `10^MAX_INTEGER_DIGITS`.
const STORAGE_BOUND: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// One of the four supported arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// Every supported operator, in display order.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Human-readable operation name.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Operator::Add => "Addition",
            Operator::Subtract => "Subtraction",
            Operator::Multiply => "Multiplication",
            Operator::Divide => "Division",
        }
    }

    /// Parse an operator symbol.
    ///
    /// # Errors
    /// Returns [`EvalError::UnknownOperator`] for anything other than `+ - * /`.
    pub fn from_symbol(symbol: &str) -> Result<Self, EvalError> {
        match symbol {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            other => Err(EvalError::UnknownOperator(other.to_owned())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

/// Evaluation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Invalid operation: {0}")]
    UnknownOperator(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Apply `op` to `a` and `b` without rounding the result.
///
/// # Errors
/// Returns [`EvalError::DivisionByZero`] when dividing by zero and
/// [`EvalError::Overflow`] when the result does not fit in a `Decimal`.
pub fn apply(a: Decimal, b: Decimal, op: Operator) -> Result<Decimal, EvalError> {
    let value = match op {
        Operator::Add => a.checked_add(b),
        Operator::Subtract => a.checked_sub(b),
        Operator::Multiply => a.checked_mul(b),
        Operator::Divide => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            a.checked_div(b)
        }
    };
    value.ok_or(EvalError::Overflow)
}

/// Evaluate `a op b` and round the result to [`RESULT_SCALE`] digits.
///
/// # Errors
/// See [`apply`]. Also returns [`EvalError::Overflow`] when the rounded
/// result is not [storable](is_storable).
pub fn evaluate(a: Decimal, b: Decimal, op: Operator) -> Result<Decimal, EvalError> {
    let result = round_result(apply(a, b, op)?);
    if is_storable(result) {
        Ok(result)
    } else {
        Err(EvalError::Overflow)
    }
}

/// Whether `value` fits `decimal(15, 8)` exactly: at most
/// [`MAX_INTEGER_DIGITS`] integer digits and [`RESULT_SCALE`] fractional digits.
#[must_use]
pub fn is_storable(value: Decimal) -> bool {
    value.abs() < STORAGE_BOUND && value.normalize().scale() <= RESULT_SCALE
}

/// Evaluate with an operator given as a raw symbol.
///
/// # Errors
/// Returns [`EvalError::UnknownOperator`] for unsupported symbols, otherwise see [`apply`].
pub fn evaluate_symbol(a: Decimal, b: Decimal, symbol: &str) -> Result<Decimal, EvalError> {
    evaluate(a, b, Operator::from_symbol(symbol)?)
}

/// Round to the stored precision and drop trailing zeros.
#[must_use]
pub fn round_result(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(RESULT_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
