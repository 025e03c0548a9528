use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{TicketTransactionType, ticket_transaction_entity, user_entity};

/// 钱包响应 (票券余额)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletResponse {
    pub user_id: i64,
    pub username: String,
    pub tickets: i64,
}

impl From<user_entity::Model> for WalletResponse {
    fn from(m: user_entity::Model) -> Self {
        WalletResponse {
            user_id: m.id,
            username: m.username,
            tickets: m.tickets,
        }
    }
}

/// 流水查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TransactionQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// 票券流水响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketTransactionResponse {
    pub id: i64,
    pub transaction_type: TicketTransactionType,
    pub amount: i64,
    pub balance_after: i64,
    pub related_raffle_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ticket_transaction_entity::Model> for TicketTransactionResponse {
    fn from(m: ticket_transaction_entity::Model) -> Self {
        TicketTransactionResponse {
            id: m.id,
            transaction_type: m.transaction_type,
            amount: m.amount,
            balance_after: m.balance_after,
            related_raffle_id: m.related_raffle_id,
            description: m.description,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// 管理端/任务系统发放票券请求 (发放额会乘以当前 boost 倍率)
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GrantTicketsRequest {
    pub user_id: i64,
    /// 基础发放额 (> 0, boost 前)
    pub amount: i64,
    pub description: Option<String>,
}

/// 发放结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GrantTicketsResponse {
    pub user_id: i64,
    /// 实际入账额 (boost 后)
    pub granted: i64,
    /// 生效的倍率 (无 boost 时为 10000)
    pub multiplier_bp: i32,
    pub new_balance: i64,
}
