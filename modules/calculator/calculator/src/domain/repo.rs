use async_trait::async_trait;
use calculator_sdk::models::{CalculationRecord, NewCalculationRecord};

/// Append-only store of completed calculations.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Persist a record, assigning its `id` and `created_at`.
    async fn append(&self, record: NewCalculationRecord) -> anyhow::Result<CalculationRecord>;

    /// At most `limit` records, newest first (`created_at` then `id`, both descending).
    async fn list_recent(&self, limit: u64) -> anyhow::Result<Vec<CalculationRecord>>;

    /// Delete every record and return how many were removed.
    async fn clear_all(&self) -> anyhow::Result<u64>;
}
