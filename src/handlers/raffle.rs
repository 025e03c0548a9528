use crate::error::AppError;
use crate::models::*;
use crate::services::RaffleService;
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
    path = "/raffles",
    tag = "raffle",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("page_size" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "获取开放中的活动列表成功", body = PaginatedResponse<RaffleSummary>)
    )
)]
/// 开放中的活动列表 (upcoming + active, 按开奖时间升序; 纯存储查询)
pub async fn list_raffles(
    service: web::Data<RaffleService>,
    query: web::Query<RaffleListQuery>,
) -> Result<HttpResponse> {
    match service.list_open_raffles(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/entries",
    tag = "raffle",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("page_size" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "获取用户入场记录成功", body = PaginatedResponse<UserEntryResponse>),
        (status = 401, description = "未授权")
    )
)]
/// 当前用户的入场记录 (跨活动, 按首次入场倒序)
pub async fn get_my_entries(
    service: web::Data<RaffleService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    match service.list_user_entries(user_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/{id}",
    tag = "raffle",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    responses(
        (status = 200, description = "获取活动详情成功", body = RaffleDetailResponse),
        (status = 404, description = "活动不存在")
    )
)]
/// 活动详情: 元数据 + 投入榜前十 + (完赛后) 中奖者与已发布种子
pub async fn get_raffle_detail(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_raffle_detail(path.into_inner()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": detail }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffles/{id}/enter",
    tag = "raffle",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    request_body = EnterRaffleRequest,
    responses(
        (status = 200, description = "入场成功", body = EnterRaffleResponse),
        (status = 400, description = "余额不足 / 活动未开放 / 超出每用户上限"),
        (status = 401, description = "未授权"),
        (status = 404, description = "活动不存在")
    )
)]
/// 入场:
/// 1. 校验活动窗口与每用户上限
/// 2. 单事务扣费 + 条目 merge-add + 流水
/// 3. 提交后镜像到活动 actor
pub async fn enter_raffle(
    service: web::Data<RaffleService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<EnterRaffleRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .enter_raffle(user_id, path.into_inner(), &body.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/{id}/verify",
    tag = "raffle",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    responses(
        (status = 200, description = "复核成功", body = VerifyDrawResponse),
        (status = 400, description = "活动尚未完赛"),
        (status = 404, description = "活动不存在")
    )
)]
/// 开奖复核: 用已发布种子重跑选择器并与存档中奖者对比
pub async fn verify_draw(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.verify_draw(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn raffle_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/raffles")
            .route("", web::get().to(list_raffles))
            .route("/entries", web::get().to(get_my_entries))
            .route("/{id}", web::get().to(get_raffle_detail))
            .route("/{id}/enter", web::post().to(enter_raffle))
            .route("/{id}/verify", web::get().to(verify_draw)),
    );
}
