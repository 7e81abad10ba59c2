//! Client wrapper that keeps calculating when the server is unreachable.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::warn;

use crate::api::{CalculatorClientV1, CalculatorError};
use crate::evaluator::{self, Operator};
use crate::models::{Calculation, HealthStatus, HistoryEntry, OperationsInfo};

/// Delegates to a remote client and evaluates `calculate` locally on
/// network failures. Server-side errors are returned unchanged, and
/// locally computed results are not added to the remote history.
#[derive(Clone)]
pub struct FallbackCalculatorClient {
    remote: Arc<dyn CalculatorClientV1>,
}

impl FallbackCalculatorClient {
    #[must_use]
    pub fn new(remote: Arc<dyn CalculatorClientV1>) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl CalculatorClientV1 for FallbackCalculatorClient {
    async fn calculate(
        &self,
        a: Decimal,
        b: Decimal,
        op: Operator,
    ) -> Result<Calculation, CalculatorError> {
        match self.remote.calculate(a, b, op).await {
            Err(err) if err.is_network() => {
                warn!(error = %err, "calculator API unavailable, using local calculation");
                let result = evaluator::evaluate(a, b, op)?;
                Ok(Calculation {
                    a,
                    b,
                    operator: op,
                    result,
                })
            }
            other => other,
        }
    }

    async fn history(&self, limit: Option<u32>) -> Result<Vec<HistoryEntry>, CalculatorError> {
        self.remote.history(limit).await
    }

    async fn clear_history(&self) -> Result<u64, CalculatorError> {
        self.remote.clear_history().await
    }

    async fn operations(&self) -> Result<OperationsInfo, CalculatorError> {
        self.remote.operations().await
    }

    async fn health(&self) -> Result<HealthStatus, CalculatorError> {
        self.remote.health().await
    }
}
