use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 派奖审计实体: 每 (活动, 中奖者) 恰好一行, append-only
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "prize_credits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub raffle_id: i64,
    pub user_id: i64,
    /// floor(prize_pool / 中奖人数)
    pub amount: i64,
    /// 选取顺序的 1-based 名次
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
