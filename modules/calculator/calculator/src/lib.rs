//! Calculator Module Implementation
//!
//! Arithmetic REST API with a persisted calculation history. The shared
//! contract (evaluator, models, client trait) lives in `calculator-sdk` and is
//! re-exported here.

#![forbid(unsafe_code)]

pub use calculator_sdk::{
    Calculation, CalculationRecord, ClientOrigin, EvalError, HistoryEntry, NewCalculationRecord,
    Operator,
};

pub mod config;
pub use config::CalculatorConfig;

pub mod module;
pub use module::CalculatorModule;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
