use crate::error::AppError;
use crate::models::*;
use crate::services::WalletService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 从请求头获取用户ID（上游鉴权网关认证后注入 X-User-Id）
fn get_user_id_from_request(req: &HttpRequest) -> Result<i64, AppError> {
    req.headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| AppError::AuthError("Missing or invalid X-User-Id header".to_string()))
}

#[utoipa::path(
    get,
    path = "/wallet",
    tag = "wallet",
    responses(
        (status = 200, description = "获取钱包成功", body = WalletResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
/// 当前用户的票券余额
pub async fn get_wallet(
    service: web::Data<WalletService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    match service.get_wallet(user_id).await {
        Ok(wallet) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": wallet }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wallet/transactions",
    tag = "wallet",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("page_size" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "获取流水成功", body = PaginatedResponse<TicketTransactionResponse>),
        (status = 401, description = "未授权")
    )
)]
/// 票券流水（分页, 倒序; 每次余额变动一行）
pub async fn get_transactions(
    service: web::Data<WalletService>,
    req: HttpRequest,
    query: web::Query<TransactionQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    match service.list_transactions(user_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn wallet_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wallet")
            .route("", web::get().to(get_wallet))
            .route("/transactions", web::get().to(get_transactions)),
    );
}
