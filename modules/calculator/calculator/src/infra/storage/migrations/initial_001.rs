use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Calculations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Calculations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Calculations::A).decimal_len(15, 8).not_null())
                    .col(ColumnDef::new(Calculations::B).decimal_len(15, 8).not_null())
                    .col(ColumnDef::new(Calculations::Operation).string_len(1).not_null())
                    .col(
                        ColumnDef::new(Calculations::Result)
                            .decimal_len(15, 8)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Calculations::IpAddress).string_len(45))
                    .col(ColumnDef::new(Calculations::UserAgent).text())
                    .col(
                        ColumnDef::new(Calculations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_calculations_created_at")
                    .table(Calculations::Table)
                    .col(Calculations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_calculations_operation")
                    .table(Calculations::Table)
                    .col(Calculations::Operation)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calculations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Calculations {
    Table,
    Id,
    A,
    B,
    Operation,
    Result,
    IpAddress,
    UserAgent,
    CreatedAt,
}
