use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{RaffleStatus, raffle_entity, raffle_entry_entity};

/// 活动列表查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RaffleListQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub page_size: Option<u32>,
}

/// 活动概要 (列表/详情共用, 纯存储视图, 不经过 actor)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RaffleSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 奖池 (票券单位)
    pub prize_pool: i64,
    /// 单张票券入场成本
    pub ticket_cost: i64,
    /// 每用户累计投入上限
    pub max_entries_per_user: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub draw_time: DateTime<Utc>,
    pub winner_count: i32,
    pub status: RaffleStatus,
}

impl From<raffle_entity::Model> for RaffleSummary {
    fn from(m: raffle_entity::Model) -> Self {
        RaffleSummary {
            id: m.id,
            name: m.name,
            description: m.description,
            prize_pool: m.prize_pool,
            ticket_cost: m.ticket_cost,
            max_entries_per_user: m.max_entries_per_user,
            start_time: m.start_time,
            end_time: m.end_time,
            draw_time: m.draw_time,
            winner_count: m.winner_count,
            status: m.status,
        }
    }
}

/// 榜单条目 (详情页展示投入最多的入场者)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopEntryView {
    pub user_id: i64,
    pub ticket_count: i64,
    pub entered_at: Option<DateTime<Utc>>,
}

impl From<raffle_entry_entity::Model> for TopEntryView {
    fn from(m: raffle_entry_entity::Model) -> Self {
        TopEntryView {
            user_id: m.user_id,
            ticket_count: m.ticket_count,
            entered_at: m.entered_at,
        }
    }
}

/// 中奖者视图 (completed 后可见, 含派奖数额与名次)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WinnerView {
    pub user_id: i64,
    pub amount: i64,
    pub position: i32,
}

/// 活动详情响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RaffleDetailResponse {
    pub raffle: RaffleSummary,
    pub top_entries: Vec<TopEntryView>,
    /// 仅 completed 时为 Some
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<WinnerView>>,
    /// 完赛后发布的种子, 用于离线复核
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,
}

/// 入场请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct EnterRaffleRequest {
    /// 本次投入的票数 (> 0)
    pub tickets: i64,
}

/// 入场响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnterRaffleResponse {
    /// 扣费后的余额
    pub new_balance: i64,
    /// 用户在该活动的累计投入
    pub total_entries: i64,
}

/// 用户入场记录 (跨活动)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserEntryResponse {
    pub raffle_id: i64,
    pub raffle_name: String,
    pub ticket_count: i64,
    pub entered_at: Option<DateTime<Utc>>,
    pub status: RaffleStatus,
}

/// 管理端创建活动请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateRaffleRequest {
    pub name: String,
    pub description: Option<String>,
    pub prize_pool: i64,
    pub ticket_cost: i64,
    pub max_entries_per_user: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub draw_time: DateTime<Utc>,
    pub winner_count: i32,
}

/// 管理端注资请求 (奖池唯一的合法变更途径)
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FundRaffleRequest {
    /// 注入奖池的票券数 (> 0)
    pub amount: i64,
}

/// 开奖结果响应 (管理端强制开奖 / 调度器日志共用)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResultResponse {
    pub raffle_id: i64,
    pub status: RaffleStatus,
    /// 有序中奖者列表 (零条目完赛时为空)
    pub winners: Vec<i64>,
    pub prize_per_winner: i64,
}

/// actor 侧账本观测 (管理端排障用)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RaffleActorStatusResponse {
    pub raffle_id: i64,
    /// 不同入场者数
    pub entrant_count: i64,
    /// 账本总票数
    pub total_tickets: i64,
}

/// 复核响应: 用已发布种子重跑选择器并与存档中奖者对比
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyDrawResponse {
    pub raffle_id: i64,
    pub server_seed: String,
    pub stored_winners: Vec<i64>,
    pub recomputed_winners: Vec<i64>,
    pub matches: bool,
}
