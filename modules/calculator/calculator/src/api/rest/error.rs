use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use calculator_sdk::EvalError;

use super::dto::{ErrorResponse, FieldViolationDto};
use crate::domain::error::{DomainError, FieldViolation};

/// Machine-readable error codes returned in the `code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    DivisionByZero,
    UnknownOperator,
    ArithmeticOverflow,
    StorageFailure,
    NotFound,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::DivisionByZero => "DIVISION_BY_ZERO",
            ErrorCode::UnknownOperator => "UNKNOWN_OPERATOR",
            ErrorCode::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            ErrorCode::StorageFailure => "STORAGE_FAILURE",
            ErrorCode::NotFound => "NOT_FOUND",
        }
    }
}

/// Error returned by REST handlers, rendered as the standard failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
    pub details: Vec<FieldViolation>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldViolation>) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("Route not found: {path}"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = (!self.details.is_empty()).then(|| {
            self.details
                .into_iter()
                .map(FieldViolationDto::from)
                .collect()
        });
        let body = ErrorResponse {
            success: false,
            error: self.message,
            code: self.code.as_str().to_owned(),
            details,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map domain errors so `?` works in handlers.
impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidInput { violations } => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidInput,
                "Invalid input parameters",
            )
            .with_details(violations),
            DomainError::InvalidLimit { value } => {
                tracing::debug!(%value, "rejected history limit");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidInput,
                    "Invalid input parameters",
                )
                .with_details(vec![FieldViolation::new(
                    "limit",
                    "The limit must be a positive integer.",
                )])
            }
            DomainError::Evaluation(err) => {
                let code = match err {
                    EvalError::DivisionByZero => ErrorCode::DivisionByZero,
                    EvalError::UnknownOperator(_) => ErrorCode::UnknownOperator,
                    EvalError::Overflow => ErrorCode::ArithmeticOverflow,
                };
                Self::new(StatusCode::BAD_REQUEST, code, err.to_string())
            }
            DomainError::Database(err) => {
                tracing::error!(error = %err, "Database error occurred");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "An internal database error occurred",
                )
            }
        }
    }
}
