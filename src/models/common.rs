use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应体 (成功响应为 {"success": true, "data": ...} 包络)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
