use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "ticket_transaction_type"
)]
#[serde(rename_all = "snake_case")]
pub enum TicketTransactionType {
    #[sea_orm(string_value = "raffle_entry")]
    RaffleEntry,
    #[sea_orm(string_value = "raffle_prize")]
    RafflePrize,
    #[sea_orm(string_value = "quest_reward")]
    QuestReward,
    #[sea_orm(string_value = "admin_grant")]
    AdminGrant,
}

impl std::fmt::Display for TicketTransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketTransactionType::RaffleEntry => write!(f, "raffle_entry"),
            TicketTransactionType::RafflePrize => write!(f, "raffle_prize"),
            TicketTransactionType::QuestReward => write!(f, "quest_reward"),
            TicketTransactionType::AdminGrant => write!(f, "admin_grant"),
        }
    }
}

/// 票券流水实体: 每次余额变动一行, 负数为扣减, 正数为入账
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ticket_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub transaction_type: TicketTransactionType,
    pub amount: i64,
    /// 变动后的余额快照
    pub balance_after: i64,
    pub related_raffle_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
