use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Tickets,
    CreatedAt,
    UpdatedAt,
}

/// Ticket Transactions (票券流水 - 所有余额变动的审计记录)
#[derive(DeriveIden)]
enum TicketTransactions {
    Table,
    Id,
    UserId,
    TransactionType,
    Amount,
    BalanceAfter,
    RelatedRaffleId,
    Description,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 流水类型枚举
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("ticket_transaction_type"))
                    .values(vec![
                        Alias::new("raffle_entry"),
                        Alias::new("raffle_prize"),
                        Alias::new("quest_reward"),
                        Alias::new("admin_grant"),
                    ])
                    .to_owned(),
            )
            .await?;

        // 用户表（票券余额为本服务唯一权威字段；资料/登录由上游负责）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::Tickets)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 票券流水表 (append-only)
        manager
            .create_table(
                Table::create()
                    .table(TicketTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::TransactionType)
                            .custom(Alias::new("ticket_transaction_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::RelatedRaffleId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::Description)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户流水查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ticket_transactions_user")
                    .table(TicketTransactions::Table)
                    .col(TicketTransactions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(TicketTransactions::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_ticket_transaction_user")
                            .from_tbl(TicketTransactions::Table)
                            .from_col(TicketTransactions::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(TicketTransactions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(Alias::new("ticket_transaction_type"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
