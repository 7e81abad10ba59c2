use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "calculations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Decimal(Some((15, 8)))")]
    pub a: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 8)))")]
    pub b: Decimal,
    #[sea_orm(column_type = "String(StringLen::N(1))")]
    pub operation: String,
    #[sea_orm(column_type = "Decimal(Some((15, 8)))")]
    pub result: Decimal,
    #[sea_orm(column_type = "String(StringLen::N(45))", nullable)]
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    pub created_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
