use crate::models::*;
use crate::services::{BoostService, RaffleService, WalletService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/raffles",
    tag = "admin",
    request_body = CreateRaffleRequest,
    responses(
        (status = 200, description = "创建活动成功", body = RaffleSummary),
        (status = 400, description = "参数校验失败")
    )
)]
/// 创建活动 (upcoming 入库, 调度器在 start_time 到达后激活)
pub async fn create_raffle(
    service: web::Data<RaffleService>,
    body: web::Json<CreateRaffleRequest>,
) -> Result<HttpResponse> {
    match service.create_raffle(&body.into_inner()).await {
        Ok(raffle) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": raffle,
            "message": "活动创建成功"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/raffles/{id}/draw",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    responses(
        (status = 200, description = "开奖成功", body = DrawResultResponse),
        (status = 400, description = "活动不在可开奖状态"),
        (status = 404, description = "活动不存在")
    )
)]
/// 强制开奖: 与调度器到期开奖走同一条路径
/// (active->drawing 条件翻转防双开奖, 重复触发幂等返回已有结果)
pub async fn force_draw(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.execute_draw(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/raffles/{id}/fund",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    request_body = FundRaffleRequest,
    responses(
        (status = 200, description = "注资成功", body = RaffleSummary),
        (status = 400, description = "活动已不可注资"),
        (status = 404, description = "活动不存在")
    )
)]
/// 奖池注资 (奖池的唯一合法变更途径, drawing/completed 后拒绝)
pub async fn fund_raffle(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
    body: web::Json<FundRaffleRequest>,
) -> Result<HttpResponse> {
    match service
        .fund_prize_pool(path.into_inner(), body.amount)
        .await
    {
        Ok(raffle) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": raffle }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/raffles/{id}/status",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    responses(
        (status = 200, description = "获取 actor 账本状态成功", body = RaffleActorStatusResponse),
        (status = 404, description = "活动不存在或账本未初始化")
    )
)]
/// actor 账本观测: 不同入场者数与总票数 (排障/对账用, 只读)
pub async fn get_actor_status(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.actor_status(path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": status }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/boost",
    tag = "admin",
    request_body = SetBoostRequest,
    responses(
        (status = 200, description = "设置全局 boost 成功", body = BoostResponse),
        (status = 400, description = "参数校验失败")
    )
)]
/// 设置全局奖励倍率 (旧记录停用, 新窗口立即生效)
pub async fn set_boost(
    service: web::Data<BoostService>,
    body: web::Json<SetBoostRequest>,
) -> Result<HttpResponse> {
    match service.set_boost(&body.into_inner()).await {
        Ok(boost) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": boost }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/grant",
    tag = "admin",
    request_body = GrantTicketsRequest,
    responses(
        (status = 200, description = "发放票券成功", body = GrantTicketsResponse),
        (status = 400, description = "参数校验失败"),
        (status = 404, description = "用户不存在")
    )
)]
/// 发放票券 (任务奖励/运营补偿; 发放额乘以当前 boost 倍率)
pub async fn grant_tickets(
    service: web::Data<WalletService>,
    body: web::Json<GrantTicketsRequest>,
) -> Result<HttpResponse> {
    match service.grant_tickets(&body.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (管理端路由由上游网关做权限拦截)
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/raffles", web::post().to(create_raffle))
            .route("/raffles/{id}/draw", web::post().to(force_draw))
            .route("/raffles/{id}/fund", web::post().to(fund_raffle))
            .route("/raffles/{id}/status", web::get().to(get_actor_status))
            .route("/boost", web::post().to(set_boost))
            .route("/grant", web::post().to(grant_tickets)),
    );
}
