use calculator_sdk::EvalError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Operand that does not fit the stored `decimal(15, 8)` precision.
    #[must_use]
    pub fn out_of_range(field: &str) -> Self {
        Self::new(
            field,
            format!("The {field} must have at most 7 integer digits and 8 decimal places."),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid input parameters")]
    InvalidInput { violations: Vec<FieldViolation> },

    #[error("Invalid limit '{value}': must be a positive integer")]
    InvalidLimit { value: String },

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn invalid_input(violations: Vec<FieldViolation>) -> Self {
        Self::InvalidInput { violations }
    }

    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            violations: vec![FieldViolation::new(field, message)],
        }
    }

    #[must_use]
    pub fn invalid_limit(value: impl Into<String>) -> Self {
        Self::InvalidLimit {
            value: value.into(),
        }
    }
}
