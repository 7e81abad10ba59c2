use async_trait::async_trait;
use calculator_sdk::models::{CalculationRecord, NewCalculationRecord};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use time::OffsetDateTime;

use crate::domain::repo::HistoryRepository;

use super::entity::{self, Entity as CalculationEntity};
use super::mapper::new_active_model;

pub struct SeaOrmHistoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmHistoryRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryRepository for SeaOrmHistoryRepository {
    async fn append(&self, record: NewCalculationRecord) -> anyhow::Result<CalculationRecord> {
        let model = new_active_model(record, OffsetDateTime::now_utc())
            .insert(&self.db)
            .await?;
        CalculationRecord::try_from(model)
    }

    async fn list_recent(&self, limit: u64) -> anyhow::Result<Vec<CalculationRecord>> {
        CalculationEntity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(CalculationRecord::try_from)
            .collect()
    }

    async fn clear_all(&self) -> anyhow::Result<u64> {
        let result = CalculationEntity::delete_many().exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
