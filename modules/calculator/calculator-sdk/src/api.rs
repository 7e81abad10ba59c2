//! Calculator API trait and error type
//!
//! Contract trait implemented by the HTTP client and by the offline fallback.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::evaluator::{EvalError, Operator};
use crate::expression::ExpressionError;
use crate::models::{Calculation, HealthStatus, HistoryEntry, OperationsInfo};

/// Calculator API trait
///
/// A remote calculator with a persisted history. Every method is attempted
/// exactly once; implementations never retry.
#[async_trait]
pub trait CalculatorClientV1: Send + Sync {
    /// Compute `a op b`.
    async fn calculate(
        &self,
        a: Decimal,
        b: Decimal,
        op: Operator,
    ) -> Result<Calculation, CalculatorError>;

    /// Most recent history entries, newest first.
    async fn history(&self, limit: Option<u32>) -> Result<Vec<HistoryEntry>, CalculatorError>;

    /// Remove every history entry. Returns the number of removed entries.
    async fn clear_history(&self) -> Result<u64, CalculatorError>;

    async fn operations(&self) -> Result<OperationsInfo, CalculatorError>;

    async fn health(&self) -> Result<HealthStatus, CalculatorError>;
}

/// Error type for calculator client operations
#[derive(Error, Debug)]
pub enum CalculatorError {
    /// The remote endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a structured failure.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The client could not be built, e.g. from a malformed base URL.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The server answered with a body that could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

impl CalculatorError {
    /// Whether the failure happened before any response was received.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, CalculatorError::Network(_))
    }
}
