use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

/// Raffles (抽奖活动元数据 - 状态机的权威记录)
#[derive(DeriveIden)]
enum Raffles {
    Table,
    Id,
    Name,
    Description,
    PrizePool,
    TicketCost,
    MaxEntriesPerUser,
    StartTime,
    EndTime,
    DrawTime,
    WinnerCount,
    Status,
    Winners,
    ServerSeed,
    CreatedAt,
    UpdatedAt,
}

/// Raffle Entries (每用户每活动一行, ticket_count 只增不减)
#[derive(DeriveIden)]
enum RaffleEntries {
    Table,
    Id,
    RaffleId,
    UserId,
    TicketCount,
    EnteredAt,
    UpdatedAt,
}

/// Raffle Ledgers (actor 持久化快照: seed + 条目镜像)
#[derive(DeriveIden)]
enum RaffleLedgers {
    Table,
    RaffleId,
    ServerSeed,
    Entries,
    Drawn,
    CreatedAt,
    UpdatedAt,
}

/// Prize Credits (每中奖者一行的派奖审计记录)
#[derive(DeriveIden)]
enum PrizeCredits {
    Table,
    Id,
    RaffleId,
    UserId,
    Amount,
    Position,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 状态枚举: upcoming -> active -> drawing -> completed (单向)
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("raffle_status"))
                    .values(vec![
                        Alias::new("upcoming"),
                        Alias::new("active"),
                        Alias::new("drawing"),
                        Alias::new("completed"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Raffles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Raffles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Raffles::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Raffles::Description).text().null())
                    .col(
                        ColumnDef::new(Raffles::PrizePool)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Raffles::TicketCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Raffles::MaxEntriesPerUser)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Raffles::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Raffles::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Raffles::DrawTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Raffles::WinnerCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Raffles::Status)
                            .custom(Alias::new("raffle_status"))
                            .not_null()
                            .default(Expr::cust("'upcoming'::raffle_status")),
                    )
                    .col(ColumnDef::new(Raffles::Winners).json_binary().null())
                    .col(ColumnDef::new(Raffles::ServerSeed).string_len(64).null())
                    .col(
                        ColumnDef::new(Raffles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Raffles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 调度器按 (status, draw_time) 扫描到期活动
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_raffles_status_draw_time")
                    .table(Raffles::Table)
                    .col(Raffles::Status)
                    .col(Raffles::DrawTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RaffleEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RaffleEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::RaffleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::TicketCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::EnteredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 每用户每活动一行 (merge-add 的唯一性基础)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_raffle_entries_raffle_user_unique")
                    .table(RaffleEntries::Table)
                    .col(RaffleEntries::RaffleId)
                    .col(RaffleEntries::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(RaffleEntries::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_raffle_entry_raffle")
                            .from_tbl(RaffleEntries::Table)
                            .from_col(RaffleEntries::RaffleId)
                            .to_tbl(Raffles::Table)
                            .to_col(Raffles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // actor 快照表: raffle_id 即主键, 每个活动一份
        manager
            .create_table(
                Table::create()
                    .table(RaffleLedgers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RaffleLedgers::RaffleId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RaffleLedgers::ServerSeed)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleLedgers::Entries)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleLedgers::Drawn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RaffleLedgers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(RaffleLedgers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PrizeCredits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrizeCredits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PrizeCredits::RaffleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PrizeCredits::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PrizeCredits::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PrizeCredits::Position).integer().not_null())
                    .col(
                        ColumnDef::new(PrizeCredits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个活动对同一用户至多派奖一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_credits_raffle_user_unique")
                    .table(PrizeCredits::Table)
                    .col(PrizeCredits::RaffleId)
                    .col(PrizeCredits::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(PrizeCredits::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_prize_credit_raffle")
                            .from_tbl(PrizeCredits::Table)
                            .from_col(PrizeCredits::RaffleId)
                            .to_tbl(Raffles::Table)
                            .to_col(Raffles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序: 派奖 -> 快照 -> 条目 -> 活动 -> 枚举
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PrizeCredits::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(RaffleLedgers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(RaffleEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Raffles::Table).to_owned())
            .await?;

        manager
            .drop_type(
                Type::drop()
                    .if_exists()
                    .name(Alias::new("raffle_status"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
