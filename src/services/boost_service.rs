use crate::entities::boost_entity as boosts;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

/// 全局 boost 服务: 一条带时间窗口的倍率记录。
/// 奖励计算方只读; 写入只来自管理端; 过期由调度器扫描。
/// 与开奖正确性无关, 只影响发放数额。
#[derive(Clone)]
pub struct BoostService {
    pool: DatabaseConnection,
}

impl BoostService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 当前生效的 boost (无则 None)
    pub async fn current_boost(&self) -> AppResult<Option<boosts::Model>> {
        let now = Utc::now();
        let current = boosts::Entity::find()
            .filter(boosts::Column::IsActive.eq(true))
            .filter(boosts::Column::StartsAt.lte(now))
            .filter(boosts::Column::ExpiresAt.gt(now))
            .order_by(boosts::Column::CreatedAt, Order::Desc)
            .one(&self.pool)
            .await?;
        Ok(current)
    }

    /// 设置新的全局 boost: 先停用现存记录, 再写入新窗口
    pub async fn set_boost(&self, req: &SetBoostRequest) -> AppResult<BoostResponse> {
        if req.multiplier_bp < 10000 {
            return Err(AppError::ValidationError(
                "Multiplier must be at least 10000 bp (1.0x)".to_string(),
            ));
        }
        if req.duration_minutes <= 0 {
            return Err(AppError::ValidationError(
                "Duration must be positive".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        boosts::Entity::update_many()
            .col_expr(boosts::Column::IsActive, Expr::value(false))
            .col_expr(boosts::Column::UpdatedAt, Expr::value(now))
            .filter(boosts::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        let model = boosts::ActiveModel {
            multiplier_bp: Set(req.multiplier_bp),
            starts_at: Set(now),
            expires_at: Set(now + Duration::minutes(req.duration_minutes)),
            is_active: Set(true),
            description: Set(req.description.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Global boost set: {} bp for {} minutes",
            req.multiplier_bp,
            req.duration_minutes
        );
        Ok(model.into())
    }

    /// 停用已过期的 boost, 返回处理条数 (调度器扫描用)
    pub async fn expire_boosts(&self) -> AppResult<u64> {
        let now = Utc::now();
        let result = boosts::Entity::update_many()
            .col_expr(boosts::Column::IsActive, Expr::value(false))
            .col_expr(boosts::Column::UpdatedAt, Expr::value(now))
            .filter(boosts::Column::IsActive.eq(true))
            .filter(boosts::Column::ExpiresAt.lte(now))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}
