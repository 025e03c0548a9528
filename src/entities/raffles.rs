use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 活动状态机, 单向: upcoming -> active -> drawing -> completed
/// (零条目的活动允许从 drawing 直接完赛且无中奖者)
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "raffle_status")]
#[serde(rename_all = "snake_case")]
pub enum RaffleStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "drawing")]
    Drawing,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaffleStatus::Upcoming => write!(f, "upcoming"),
            RaffleStatus::Active => write!(f, "active"),
            RaffleStatus::Drawing => write!(f, "drawing"),
            RaffleStatus::Completed => write!(f, "completed"),
        }
    }
}

/// 抽奖活动实体
/// 概念说明:
/// - prize_pool: 奖池 (票券单位), 仅管理员注资可变, 开奖本身不改动
/// - server_seed: 完赛时发布的种子, 一经写入不可变, 跨活动不复用
/// - winners: 有序中奖者 user_id 列表 (JSON), 仅 completed 时非空
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "raffles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub prize_pool: i64,
    /// 单张票券的入场成本
    pub ticket_cost: i64,
    /// 每用户累计投入上限
    pub max_entries_per_user: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// draw_time >= end_time >= start_time
    pub draw_time: DateTime<Utc>,
    pub winner_count: i32,
    pub status: RaffleStatus,
    pub winners: Option<Json>,
    pub server_seed: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 是否在可入场窗口内 (active 且 now ∈ [start_time, end_time))
    pub fn accepts_entries_at(&self, now: DateTime<Utc>) -> bool {
        self.status == RaffleStatus::Active && now >= self.start_time && now < self.end_time
    }

    /// 开奖时间是否已到
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.draw_time
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
