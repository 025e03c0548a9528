use sea_orm_migration::prelude::*;

/// Boosts (全局奖励倍率记录, 带时间窗口)
/// multiplier_bp 使用 basis points: 10000 = 1.0x, 15000 = 1.5x
#[derive(DeriveIden)]
enum Boosts {
    Table,
    Id,
    MultiplierBp,
    StartsAt,
    ExpiresAt,
    IsActive,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Boosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Boosts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Boosts::MultiplierBp)
                            .integer()
                            .not_null()
                            .default(10000),
                    )
                    .col(
                        ColumnDef::new(Boosts::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Boosts::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Boosts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Boosts::Description).string_len(255).null())
                    .col(
                        ColumnDef::new(Boosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Boosts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 过期扫描索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_boosts_active_expires")
                    .table(Boosts::Table)
                    .col(Boosts::IsActive)
                    .col(Boosts::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Boosts::Table).to_owned())
            .await?;

        Ok(())
    }
}
