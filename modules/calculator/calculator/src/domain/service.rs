use std::sync::Arc;

use calculator_sdk::evaluator::{self, Operator};
use calculator_sdk::models::{
    Calculation, ClientOrigin, HealthStatus, HistoryEntry, NewCalculationRecord,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, instrument};

use super::error::{DomainError, FieldViolation};
use super::repo::HistoryRepository;
use crate::config::CalculatorConfig;

/// Calculator domain service.
///
/// Evaluates calculations and owns the history policy. History appends run
/// as tracked background tasks so a slow or failing store never delays or
/// fails a calculation response.
pub struct Service {
    repo: Arc<dyn HistoryRepository>,
    config: CalculatorConfig,
    writes: TaskTracker,
    drain_lock: Mutex<()>,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn HistoryRepository>, config: CalculatorConfig) -> Self {
        Self {
            repo,
            config,
            writes: TaskTracker::new(),
            drain_lock: Mutex::new(()),
        }
    }

    /// Evaluate `a op b` and schedule one history append on success.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidInput`] if an operand does not fit the
    /// stored precision and [`DomainError::Evaluation`] on division by zero or
    /// a result outside that precision. Nothing is recorded in either case.
    #[instrument(skip(self, origin))]
    pub fn calculate(
        &self,
        a: Decimal,
        b: Decimal,
        operator: Operator,
        origin: ClientOrigin,
    ) -> Result<Calculation, DomainError> {
        let violations: Vec<FieldViolation> = [("a", a), ("b", b)]
            .into_iter()
            .filter(|(_, value)| !evaluator::is_storable(*value))
            .map(|(field, _)| FieldViolation::out_of_range(field))
            .collect();
        if !violations.is_empty() {
            return Err(DomainError::invalid_input(violations));
        }

        let result = evaluator::evaluate(a, b, operator)?;
        let calculation = Calculation {
            a,
            b,
            operator,
            result,
        };
        debug!(%result, "calculation evaluated");

        self.record_calculation(NewCalculationRecord {
            calculation: calculation.clone(),
            origin,
        });
        Ok(calculation)
    }

    fn record_calculation(&self, record: NewCalculationRecord) {
        let repo = Arc::clone(&self.repo);
        self.writes.spawn(async move {
            match repo.append(record).await {
                Ok(saved) => debug!(id = saved.id, "calculation recorded"),
                Err(e) => error!(error = %e, "failed to record calculation in history"),
            }
        });
    }

    /// Wait until every scheduled history append has finished.
    ///
    /// Meant for shutdown and tests. Concurrent drains run one after another,
    /// so no caller can reopen the tracker while another is still waiting.
    pub async fn drain_history_writes(&self) {
        let _guard = self.drain_lock.lock().await;
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }

    /// Resolve the requested page size against the configured bounds.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidLimit`] for zero or negative values.
    pub fn effective_limit(&self, limit: Option<i64>) -> Result<u64, DomainError> {
        match limit {
            None => Ok(self.config.default_history_limit),
            Some(value) => match u64::try_from(value) {
                Ok(0) | Err(_) => Err(DomainError::invalid_limit(value.to_string())),
                Ok(n) => Ok(n.min(self.config.max_history_limit)),
            },
        }
    }

    /// Most recent history entries, newest first.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidLimit`] for a non-positive limit and
    /// [`DomainError::Database`] if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn list_history(&self, limit: Option<i64>) -> Result<Vec<HistoryEntry>, DomainError> {
        let limit = self.effective_limit(limit)?;
        let records = self.repo.list_recent(limit).await?;
        debug!(count = records.len(), "history loaded");
        Ok(records.into_iter().map(HistoryEntry::from).collect())
    }

    /// Remove every history entry.
    ///
    /// # Errors
    /// Returns [`DomainError::Database`] if the store cannot be cleared.
    #[instrument(skip(self))]
    pub async fn clear_history(&self) -> Result<u64, DomainError> {
        let deleted = self.repo.clear_all().await?;
        info!(deleted, "history cleared");
        Ok(deleted)
    }

    #[must_use]
    pub fn health() -> HealthStatus {
        HealthStatus {
            status: "healthy".to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}
