use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::boost_entity;

/// 管理端设置全局 boost 请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SetBoostRequest {
    /// 倍率 (basis points, 10000 = 1.0x; 必须 >= 10000)
    pub multiplier_bp: i32,
    /// 生效时长 (分钟, > 0)
    pub duration_minutes: i64,
    pub description: Option<String>,
}

/// Boost 视图
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoostResponse {
    pub id: i64,
    pub multiplier_bp: i32,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub description: Option<String>,
}

impl From<boost_entity::Model> for BoostResponse {
    fn from(m: boost_entity::Model) -> Self {
        BoostResponse {
            id: m.id,
            multiplier_bp: m.multiplier_bp,
            starts_at: m.starts_at,
            expires_at: m.expires_at,
            is_active: m.is_active,
            description: m.description,
        }
    }
}
