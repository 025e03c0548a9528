use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 入场条目实体: 每用户每活动一行, ticket_count 只通过 merge-add 增长
/// 本表是"已扣费票数"的权威记录, actor 侧快照以此为准做对账
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "raffle_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub raffle_id: i64,
    pub user_id: i64,
    pub ticket_count: i64,
    /// 首次入场时间
    pub entered_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
