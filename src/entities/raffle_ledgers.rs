use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Actor 持久化快照实体: 每活动一行 (raffle_id 即主键)
/// entries 为 JSON 数组 [{user_id, ticket_count}], 与 raffle_entries 同构,
/// 丢失时可完全由 raffle_entries 重建
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "raffle_ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub raffle_id: i64,
    pub server_seed: String,
    pub entries: Json,
    /// 快照是否已被某次开奖消费 (冻结标志)
    pub drawn: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
