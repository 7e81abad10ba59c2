use std::collections::BTreeMap;
use std::str::FromStr;

use calculator_sdk::Operator;
use calculator_sdk::evaluator;
use calculator_sdk::models::{Calculation, HealthStatus, HistoryEntry, OperationsInfo};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

use crate::domain::error::{DomainError, FieldViolation};

/// Body of `POST /calculate`.
///
/// `a` and `b` accept JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CalculateRequest {
    #[schema(value_type = f64, example = 5)]
    pub a: Decimal,
    #[schema(value_type = f64, example = 3)]
    pub b: Decimal,
    #[schema(value_type = String, example = "+")]
    pub operation: Operator,
}

impl TryFrom<&Value> for CalculateRequest {
    type Error = DomainError;

    /// Validate every field and report all violations at once.
    fn try_from(body: &Value) -> Result<Self, Self::Error> {
        let Some(fields) = body.as_object() else {
            return Err(DomainError::invalid_field(
                "body",
                "The request body must be a JSON object.",
            ));
        };

        let mut violations = Vec::new();
        let a = numeric_field(fields.get("a"), "a", &mut violations);
        let b = numeric_field(fields.get("b"), "b", &mut violations);
        let operation = operation_field(fields.get("operation"), &mut violations);

        match (a, b, operation) {
            (Some(a), Some(b), Some(operation)) if violations.is_empty() => {
                Ok(Self { a, b, operation })
            }
            _ => Err(DomainError::invalid_input(violations)),
        }
    }
}

fn numeric_field(
    value: Option<&Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Decimal> {
    let parsed = match value {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(
                field,
                format!("The {field} field is required."),
            ));
            return None;
        }
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        Some(_) => None,
    };

    match parsed {
        None => {
            violations.push(FieldViolation::new(
                field,
                format!("The {field} must be a number."),
            ));
            None
        }
        Some(value) if !evaluator::is_storable(value) => {
            violations.push(FieldViolation::out_of_range(field));
            None
        }
        Some(value) => Some(value),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn operation_field(value: Option<&Value>, violations: &mut Vec<FieldViolation>) -> Option<Operator> {
    match value {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(
                "operation",
                "The operation field is required.",
            ));
            None
        }
        Some(Value::String(s)) => {
            let op = Operator::from_symbol(s).ok();
            if op.is_none() {
                violations.push(FieldViolation::new(
                    "operation",
                    "The selected operation is invalid.",
                ));
            }
            op
        }
        Some(_) => {
            violations.push(FieldViolation::new(
                "operation",
                "The selected operation is invalid.",
            ));
            None
        }
    }
}

/// Query of `GET /history`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of entries to return (default 50, max 100).
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

impl HistoryQuery {
    /// Parse the raw `limit` parameter.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidLimit`] if it is not an integer.
    pub fn limit(&self) -> Result<Option<i64>, DomainError> {
        self.limit
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| DomainError::invalid_limit(raw))
            })
            .transpose()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalculationDto {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub a: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub b: Decimal,
    #[schema(value_type = String)]
    pub operation: Operator,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub result: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalculateResponse {
    pub success: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub result: Decimal,
    pub calculation: CalculationDto,
}

impl From<Calculation> for CalculateResponse {
    fn from(calc: Calculation) -> Self {
        Self {
            success: true,
            result: calc.result,
            calculation: CalculationDto {
                a: calc.a,
                b: calc.b,
                operation: calc.operator,
                result: calc.result,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryDto {
    pub id: i64,
    /// `"{a} {operation} {b} = {result}"`
    pub calculation: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub result: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: OffsetDateTime,
}

impl From<HistoryEntry> for HistoryEntryDto {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            calculation: entry.calculation,
            result: entry.result,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryEntryDto>,
    pub count: usize,
}

impl From<Vec<HistoryEntry>> for HistoryResponse {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        let history: Vec<HistoryEntryDto> = entries.into_iter().map(Into::into).collect();
        Self {
            success: true,
            count: history.len(),
            history,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub message: String,
    pub deleted: u64,
}

impl ClearHistoryResponse {
    #[must_use]
    pub fn new(deleted: u64) -> Self {
        Self {
            success: true,
            message: "History cleared successfully".to_owned(),
            deleted,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperationsResponse {
    pub success: bool,
    #[schema(value_type = Vec<String>)]
    pub operations: Vec<Operator>,
    pub description: BTreeMap<String, String>,
}

impl From<OperationsInfo> for OperationsResponse {
    fn from(info: OperationsInfo) -> Self {
        Self {
            success: true,
            operations: info.operations,
            description: info.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: OffsetDateTime,
    pub version: String,
}

impl From<HealthStatus> for HealthResponse {
    fn from(health: HealthStatus) -> Self {
        Self {
            success: true,
            status: health.status,
            timestamp: health.timestamp,
            version: health.version,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FieldViolationDto {
    pub field: String,
    pub message: String,
}

impl From<FieldViolation> for FieldViolationDto {
    fn from(v: FieldViolation) -> Self {
        Self {
            field: v.field,
            message: v.message,
        }
    }
}

/// Failure envelope shared by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolationDto>>,
}
