//! Calculator SDK
//!
//! This crate provides everything needed to consume the calculator service:
//! - Arithmetic evaluator shared with the server (`evaluate`, `Operator`)
//! - API trait (`CalculatorClientV1`) and error type (`CalculatorError`)
//! - HTTP client (`CalculatorHttpClient`) and offline wrapper (`FallbackCalculatorClient`)
//! - Local expression evaluator and keypad state machine
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use calculator_sdk::{CalculatorClientV1, CalculatorHttpClient, FallbackCalculatorClient, Operator};
//!
//! let remote = Arc::new(CalculatorHttpClient::new("http://127.0.0.1:8087")?);
//! let client = FallbackCalculatorClient::new(remote);
//! let calc = client.calculate(5.into(), 3.into(), Operator::Add).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === EVALUATION ===
pub mod evaluator;
pub mod expression;
pub use evaluator::{
    EvalError, MAX_INTEGER_DIGITS, Operator, RESULT_SCALE, evaluate, evaluate_symbol, is_storable,
};
pub use expression::{ExpressionError, evaluate_expression};

// === MODELS ===
pub mod models;
pub use models::{
    Calculation, CalculationRecord, ClientOrigin, HealthStatus, HistoryEntry,
    NewCalculationRecord, OperationsInfo,
};

// === API TRAIT AND TYPES ===
mod api;
pub use api::{CalculatorClientV1, CalculatorError};

// === CLIENTS ===
mod client;
mod fallback;
pub use client::{CalculatorHttpClient, DEFAULT_TIMEOUT};
pub use fallback::FallbackCalculatorClient;

// === KEYPAD ===
pub mod keypad;
pub use keypad::{Key, Keypad, KeypadEvent};
