use anyhow::anyhow;
use calculator_sdk::evaluator::{self, Operator};
use calculator_sdk::models::{Calculation, CalculationRecord, ClientOrigin, NewCalculationRecord};
use sea_orm::ActiveValue;
use time::OffsetDateTime;

use super::entity;

impl TryFrom<entity::Model> for CalculationRecord {
    type Error = anyhow::Error;

    fn try_from(model: entity::Model) -> Result<Self, Self::Error> {
        let operator = Operator::from_symbol(&model.operation)
            .map_err(|e| anyhow!("history row {} is corrupt: {e}", model.id))?;

        // SQLite keeps decimals as REAL; rounding drops binary artifacts.
        Ok(Self {
            id: model.id,
            calculation: Calculation {
                a: evaluator::round_result(model.a),
                b: evaluator::round_result(model.b),
                operator,
                result: evaluator::round_result(model.result),
            },
            origin: ClientOrigin {
                address: model.ip_address,
                agent: model.user_agent,
            },
            created_at: model.created_at,
        })
    }
}

/// Build the insert model for a new history row.
#[must_use]
pub fn new_active_model(
    record: NewCalculationRecord,
    created_at: OffsetDateTime,
) -> entity::ActiveModel {
    let NewCalculationRecord {
        calculation,
        origin,
    } = record;

    entity::ActiveModel {
        id: ActiveValue::NotSet,
        a: ActiveValue::Set(calculation.a),
        b: ActiveValue::Set(calculation.b),
        operation: ActiveValue::Set(calculation.operator.symbol().to_owned()),
        result: ActiveValue::Set(calculation.result),
        ip_address: ActiveValue::Set(origin.address),
        user_agent: ActiveValue::Set(origin.agent),
        created_at: ActiveValue::Set(created_at),
    }
}
