use crate::entities::{
    TicketTransactionType, ticket_transaction_entity as txns, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::BoostService;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 用户票券账本服务: 余额查询、流水、以及入账/扣减原语。
/// 核心只计算"给谁、多少", 余额本身归这里管; 每次变动都在同一事务内
/// 落一行流水 (balance_after 快照), 保证账变与审计不可分离。
#[derive(Clone)]
pub struct WalletService {
    pool: DatabaseConnection,
    boost_service: BoostService,
}

impl WalletService {
    pub fn new(pool: DatabaseConnection, boost_service: BoostService) -> Self {
        Self {
            pool,
            boost_service,
        }
    }

    /// 获取用户钱包 (余额)
    pub async fn get_wallet(&self, user_id: i64) -> AppResult<WalletResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    /// 获取票券流水（分页, 倒序）
    pub async fn list_transactions(
        &self,
        user_id: i64,
        query: &TransactionQuery,
    ) -> AppResult<PaginatedResponse<TicketTransactionResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let base_query = txns::Entity::find().filter(txns::Column::UserId.eq(user_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items_models = base_query
            .order_by(txns::Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<TicketTransactionResponse> =
            items_models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 任务/管理端发放票券, 发放额乘以当前全局 boost 倍率 (向下取整)
    pub async fn grant_tickets(&self, req: &GrantTicketsRequest) -> AppResult<GrantTicketsResponse> {
        if req.amount <= 0 {
            return Err(AppError::ValidationError(
                "Grant amount must be positive".to_string(),
            ));
        }

        let boost = self.boost_service.current_boost().await?;
        let multiplier_bp = boost.as_ref().map(|b| b.multiplier_bp).unwrap_or(10000);
        let granted = boost
            .as_ref()
            .map(|b| b.apply(req.amount))
            .unwrap_or(req.amount);

        let txn = self.pool.begin().await?;
        let new_balance = self
            .credit_in_txn(
                &txn,
                req.user_id,
                granted,
                TicketTransactionType::QuestReward,
                None,
                req.description.clone(),
            )
            .await?;
        txn.commit().await?;

        Ok(GrantTicketsResponse {
            user_id: req.user_id,
            granted,
            multiplier_bp,
            new_balance,
        })
    }

    /// 事务内条件扣减: tickets >= amount 时才生效, 否则整个操作失败且
    /// 不产生任何状态变更。返回扣减后余额。
    pub async fn debit_in_txn(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
        amount: i64,
        transaction_type: TicketTransactionType,
        related_raffle_id: Option<i64>,
        description: Option<String>,
    ) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Debit amount must be positive".to_string(),
            ));
        }

        // 原子条件扣减 (乐观: update where tickets >= amount)
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Tickets,
                Expr::col(users::Column::Tickets).sub(amount),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Tickets.gte(amount))
            .exec(txn)
            .await?;

        if result.rows_affected != 1 {
            return match users::Entity::find_by_id(user_id).one(txn).await? {
                None => Err(AppError::NotFound("User not found".to_string())),
                Some(u) => Err(AppError::InsufficientTickets {
                    required: amount,
                    available: u.tickets,
                }),
            };
        }

        let user = users::Entity::find_by_id(user_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        txns::ActiveModel {
            user_id: Set(user_id),
            transaction_type: Set(transaction_type),
            amount: Set(-amount),
            balance_after: Set(user.tickets),
            related_raffle_id: Set(related_raffle_id),
            description: Set(description),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(user.tickets)
    }

    /// 事务内入账, 返回入账后余额
    pub async fn credit_in_txn(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
        amount: i64,
        transaction_type: TicketTransactionType,
        related_raffle_id: Option<i64>,
        description: Option<String>,
    ) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Credit amount must be positive".to_string(),
            ));
        }

        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Tickets,
                Expr::col(users::Column::Tickets).add(amount),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(user_id))
            .exec(txn)
            .await?;

        if result.rows_affected != 1 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        txns::ActiveModel {
            user_id: Set(user_id),
            transaction_type: Set(transaction_type),
            amount: Set(amount),
            balance_after: Set(user.tickets),
            related_raffle_id: Set(related_raffle_id),
            description: Set(description),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(user.tickets)
    }
}
