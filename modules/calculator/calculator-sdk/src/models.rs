//! Public models for the calculator module.
//!
//! These are transport-agnostic data structures shared between the server
//! module and its clients.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::evaluator::Operator;

/// A single computed calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub a: Decimal,
    pub b: Decimal,
    pub operator: Operator,
    pub result: Decimal,
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = {}", self.a, self.operator, self.b, self.result)
    }
}

/// Network origin of a calculation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOrigin {
    pub address: Option<String>,
    pub agent: Option<String>,
}

/// Record to append to the history; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalculationRecord {
    pub calculation: Calculation,
    pub origin: ClientOrigin,
}

/// Persisted history record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationRecord {
    pub id: i64,
    pub calculation: Calculation,
    pub origin: ClientOrigin,
    pub created_at: OffsetDateTime,
}

/// History entry as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    /// Formatted as `"{a} {operator} {b} = {result}"`.
    pub calculation: String,
    pub result: Decimal,
    pub timestamp: OffsetDateTime,
}

impl From<CalculationRecord> for HistoryEntry {
    fn from(record: CalculationRecord) -> Self {
        Self {
            id: record.id,
            calculation: record.calculation.to_string(),
            result: record.calculation.result,
            timestamp: record.created_at,
        }
    }
}

/// Supported operations with their descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationsInfo {
    pub operations: Vec<Operator>,
    pub description: BTreeMap<String, String>,
}

impl OperationsInfo {
    #[must_use]
    pub fn supported() -> Self {
        Self {
            operations: Operator::ALL.to_vec(),
            description: Operator::ALL
                .iter()
                .map(|op| (op.symbol().to_owned(), op.description().to_owned()))
                .collect(),
        }
    }
}

/// Service health report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: OffsetDateTime,
    pub version: String,
}
