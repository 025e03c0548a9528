use std::collections::HashMap;

use crate::actors::{DrawOutcome, LedgerEntryRow, RaffleActorRegistry};
use crate::entities::{
    RaffleStatus, TicketTransactionType, prize_credit_entity as credits,
    raffle_entity as raffles, raffle_entry_entity as entries, raffle_ledger_entity as ledgers,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::WalletService;
use crate::utils::{generate_server_seed, select_winners};
use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 调度器补给用的活动模板 (奖池/时长在区间内随机)
struct RaffleTemplate {
    name: &'static str,
    description: &'static str,
    prize_pool: (i64, i64),
    ticket_cost: i64,
    max_entries_per_user: i64,
    duration_minutes: (i64, i64),
    winner_count: i32,
}

const RAFFLE_TEMPLATES: &[RaffleTemplate] = &[
    RaffleTemplate {
        name: "Neon Jackpot",
        description: "Hourly pot for casual players",
        prize_pool: (500, 1500),
        ticket_cost: 10,
        max_entries_per_user: 10,
        duration_minutes: (45, 90),
        winner_count: 1,
    },
    RaffleTemplate {
        name: "Midnight Pot",
        description: "Bigger pool, split across three winners",
        prize_pool: (2000, 5000),
        ticket_cost: 25,
        max_entries_per_user: 20,
        duration_minutes: (120, 240),
        winner_count: 3,
    },
    RaffleTemplate {
        name: "Token Stash",
        description: "Cheap entries, quick turnaround",
        prize_pool: (200, 600),
        ticket_cost: 5,
        max_entries_per_user: 5,
        duration_minutes: (20, 40),
        winner_count: 1,
    },
    RaffleTemplate {
        name: "High Roller Vault",
        description: "Steep entries for a heavy pool",
        prize_pool: (8000, 15000),
        ticket_cost: 100,
        max_entries_per_user: 50,
        duration_minutes: (240, 480),
        winner_count: 5,
    },
];

/// 活动生命周期编排服务: 入场网关、开奖路径、列表查询与补给。
///
/// 关键不变量:
/// - 入场的扣费/条目/流水在单事务内提交, actor 镜像只在提交后尽力而为
/// - active->drawing 的条件更新是防双开奖的唯一串行化点
/// - 派奖只发生在 drawing->completed 条件更新成功的那个事务内,
///   重试依赖选择器的确定性, 达成 exactly-once 效果
#[derive(Clone)]
pub struct RaffleService {
    pool: DatabaseConnection,
    actors: RaffleActorRegistry,
    wallet_service: WalletService,
}

impl RaffleService {
    pub fn new(
        pool: DatabaseConnection,
        actors: RaffleActorRegistry,
        wallet_service: WalletService,
    ) -> Self {
        Self {
            pool,
            actors,
            wallet_service,
        }
    }

    // -----------------------------
    // 查询路径 (纯存储, 不经过 actor)
    // -----------------------------

    /// 开放中的活动列表 (upcoming + active, 按开奖时间升序)
    pub async fn list_open_raffles(
        &self,
        query: &RaffleListQuery,
    ) -> AppResult<PaginatedResponse<RaffleSummary>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let base_query = raffles::Entity::find().filter(
            raffles::Column::Status.is_in([RaffleStatus::Upcoming, RaffleStatus::Active]),
        );

        let total = base_query.clone().count(&self.pool).await? as i64;

        let models = base_query
            .order_by(raffles::Column::DrawTime, Order::Asc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<RaffleSummary> = models.into_iter().map(Into::into).collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 活动详情: 元数据 + 投入榜 + (完赛后) 中奖者与种子
    pub async fn get_raffle_detail(&self, raffle_id: i64) -> AppResult<RaffleDetailResponse> {
        let raffle = self.find_raffle(raffle_id).await?;

        let top_entries = entries::Entity::find()
            .filter(entries::Column::RaffleId.eq(raffle_id))
            .order_by(entries::Column::TicketCount, Order::Desc)
            .limit(10)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let (winners, server_seed) = if raffle.status == RaffleStatus::Completed {
            let credit_rows = credits::Entity::find()
                .filter(credits::Column::RaffleId.eq(raffle_id))
                .order_by(credits::Column::Position, Order::Asc)
                .all(&self.pool)
                .await?;
            let winners = credit_rows
                .into_iter()
                .map(|c| WinnerView {
                    user_id: c.user_id,
                    amount: c.amount,
                    position: c.position,
                })
                .collect();
            (Some(winners), raffle.server_seed.clone())
        } else {
            (None, None)
        };

        Ok(RaffleDetailResponse {
            raffle: raffle.into(),
            top_entries,
            winners,
            server_seed,
        })
    }

    /// 用户的入场记录 (跨活动, 按首次入场倒序)
    pub async fn list_user_entries(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserEntryResponse>> {
        let base_query = entries::Entity::find().filter(entries::Column::UserId.eq(user_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let rows = base_query
            .order_by(entries::Column::EnteredAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let raffle_ids: Vec<i64> = rows.iter().map(|r| r.raffle_id).collect();
        let raffle_map: HashMap<i64, raffles::Model> = raffles::Entity::find()
            .filter(raffles::Column::Id.is_in(raffle_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let items = rows
            .into_iter()
            .map(|row| {
                let raffle = raffle_map.get(&row.raffle_id);
                UserEntryResponse {
                    raffle_id: row.raffle_id,
                    raffle_name: raffle.map(|r| r.name.clone()).unwrap_or_default(),
                    ticket_count: row.ticket_count,
                    entered_at: row.entered_at,
                    status: raffle
                        .map(|r| r.status.clone())
                        .unwrap_or(RaffleStatus::Completed),
                }
            })
            .collect();

        Ok(PaginatedResponse::new(items, params, total))
    }

    // -----------------------------
    // 入场路径
    // -----------------------------

    /// 入场:
    /// 1. 校验活动窗口 / 票数 / 每用户上限
    /// 2. 单事务: 条件扣费 + 条目 merge-add + 流水
    /// 3. 提交后尽力镜像到 actor (失败只记日志, 开奖时对账兜底)
    pub async fn enter_raffle(
        &self,
        user_id: i64,
        raffle_id: i64,
        req: &EnterRaffleRequest,
    ) -> AppResult<EnterRaffleResponse> {
        if req.tickets <= 0 {
            return Err(AppError::ValidationError(
                "Ticket count must be positive".to_string(),
            ));
        }

        let raffle = self.find_raffle(raffle_id).await?;
        let now = Utc::now();
        if !raffle.accepts_entries_at(now) {
            return Err(AppError::RaffleNotActive(format!(
                "Raffle '{}' is not accepting entries (status: {})",
                raffle.name, raffle.status
            )));
        }

        let cost = entry_cost(raffle.ticket_cost, req.tickets)?;

        let txn = self.pool.begin().await?;

        // 条目 merge-add, 上限校验与更新在同一条件语句内防并发超限
        let existing = entries::Entity::find()
            .filter(entries::Column::RaffleId.eq(raffle_id))
            .filter(entries::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;

        let user_total = match existing {
            Some(row) => {
                check_entry_cap(row.ticket_count, req.tickets, raffle.max_entries_per_user)?;
                let result = entries::Entity::update_many()
                    .col_expr(
                        entries::Column::TicketCount,
                        Expr::col(entries::Column::TicketCount).add(req.tickets),
                    )
                    .col_expr(entries::Column::UpdatedAt, Expr::value(now))
                    .filter(entries::Column::Id.eq(row.id))
                    // 上限守卫: ticket_count + req <= max, 用常量形式避开并发超限
                    .filter(
                        entries::Column::TicketCount
                            .lte(raffle.max_entries_per_user - req.tickets),
                    )
                    .exec(&txn)
                    .await?;
                if result.rows_affected != 1 {
                    return Err(AppError::ExceedsMaxEntries(format!(
                        "Raffle allows at most {} tickets per user",
                        raffle.max_entries_per_user
                    )));
                }
                row.ticket_count + req.tickets
            }
            None => {
                check_entry_cap(0, req.tickets, raffle.max_entries_per_user)?;
                entries::ActiveModel {
                    raffle_id: Set(raffle_id),
                    user_id: Set(user_id),
                    ticket_count: Set(req.tickets),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                req.tickets
            }
        };

        // 条件扣费 (余额不足时整个事务回滚, 条目不会残留)
        let new_balance = self
            .wallet_service
            .debit_in_txn(
                &txn,
                user_id,
                cost,
                TicketTransactionType::RaffleEntry,
                Some(raffle_id),
                Some(format!(
                    "Entered raffle '{}' with {} tickets",
                    raffle.name, req.tickets
                )),
            )
            .await?;

        txn.commit().await?;

        // 镜像失败不影响入场结果: 关系表已是权威记录
        if let Err(e) = self.mirror_entry(raffle_id, user_id, req.tickets).await {
            log::warn!(
                "Failed to mirror entry to raffle actor {raffle_id} (user {user_id}): {e:?}; will rebuild at draw time"
            );
        }

        Ok(EnterRaffleResponse {
            new_balance,
            total_entries: user_total,
        })
    }

    async fn mirror_entry(&self, raffle_id: i64, user_id: i64, tickets: i64) -> AppResult<()> {
        // 快照行缺失时惰性初始化 (已存在则保持原种子不变)
        self.actors
            .init(raffle_id, &generate_server_seed())
            .await?;
        self.actors.enter(raffle_id, user_id, tickets).await?;
        Ok(())
    }

    // -----------------------------
    // 开奖路径
    // -----------------------------

    /// 开奖 (调度器到期触发 / 管理端强制触发共用):
    /// 1. active -> drawing 条件翻转 (已是 drawing 的视为恢复续跑)
    /// 2. actor 开奖 (内部先与关系表对账)
    /// 3. NoEntries -> 零中奖者完赛; 其它失败 -> 回滚到 active 可重试
    /// 4. 单事务派奖, 以 drawing -> completed 条件更新作为提交点
    pub async fn execute_draw(&self, raffle_id: i64) -> AppResult<DrawResultResponse> {
        let raffle = self.find_raffle(raffle_id).await?;

        match raffle.status {
            RaffleStatus::Completed => return self.completed_result(raffle_id).await,
            RaffleStatus::Upcoming => {
                return Err(AppError::RaffleNotActive(
                    "Raffle has not started yet".to_string(),
                ));
            }
            RaffleStatus::Active => {
                let result = raffles::Entity::update_many()
                    .col_expr(raffles::Column::Status, RaffleStatus::Drawing.as_enum())
                    .col_expr(raffles::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(raffles::Column::Id.eq(raffle_id))
                    .filter(raffles::Column::Status.eq(RaffleStatus::Active))
                    .exec(&self.pool)
                    .await?;

                if result.rows_affected != 1 {
                    // 与并发 drawer 竞争失败: 重新读取决定走向
                    let current = self.find_raffle(raffle_id).await?;
                    match current.status {
                        RaffleStatus::Drawing => {} // 对方尚未提交, 确定性重算安全
                        RaffleStatus::Completed => return self.completed_result(raffle_id).await,
                        _ => {
                            return Err(AppError::RaffleNotActive(format!(
                                "Raffle {raffle_id} left drawable state"
                            )));
                        }
                    }
                }
            }
            // 上次开奖中断 (进程崩溃/存储失败): 从 drawing 恢复续跑
            RaffleStatus::Drawing => {}
        }

        // 快照行缺失的防御性初始化 (零镜像活动也能走到 NoEntries 终态)
        self.actors
            .init(raffle_id, &generate_server_seed())
            .await?;

        let winner_count = raffle.winner_count.max(1) as usize;
        let outcome = match self.actors.draw(raffle_id, winner_count).await {
            Ok(outcome) => outcome,
            Err(AppError::NoEntries) => return self.finalize_empty(raffle_id).await,
            Err(e) => {
                // 状态回滚, 不能让活动永远卡在 drawing
                if let Err(revert_err) = self.revert_to_active(raffle_id).await {
                    log::error!(
                        "Failed to revert raffle {raffle_id} back to active: {revert_err:?}"
                    );
                }
                return Err(e);
            }
        };

        self.commit_draw(&raffle, outcome).await
    }

    /// 派奖提交: drawing -> completed 条件更新成功的事务内完成
    /// 全部余额入账与审计写入; 竞争失败则回滚并返回已提交的结果。
    async fn commit_draw(
        &self,
        raffle: &raffles::Model,
        outcome: DrawOutcome,
    ) -> AppResult<DrawResultResponse> {
        let ledger = ledgers::Entity::find_by_id(raffle.id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Ledger snapshot missing for raffle {}", raffle.id))
            })?;

        let winners_json = serde_json::to_value(&outcome.winners)?;
        let txn = self.pool.begin().await?;

        let result = raffles::Entity::update_many()
            .col_expr(raffles::Column::Status, RaffleStatus::Completed.as_enum())
            .col_expr(raffles::Column::Winners, Expr::value(winners_json))
            .col_expr(
                raffles::Column::ServerSeed,
                Expr::value(ledger.server_seed.clone()),
            )
            .col_expr(raffles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(raffles::Column::Id.eq(raffle.id))
            .filter(raffles::Column::Status.eq(RaffleStatus::Drawing))
            .exec(&txn)
            .await?;

        if result.rows_affected != 1 {
            // 另一个 drawer 先提交了; 确定性保证其结果与本次一致
            txn.rollback().await?;
            return self.completed_result(raffle.id).await;
        }

        for (idx, winner) in outcome.winners.iter().enumerate() {
            self.wallet_service
                .credit_in_txn(
                    &txn,
                    *winner,
                    outcome.prize_per_winner,
                    TicketTransactionType::RafflePrize,
                    Some(raffle.id),
                    Some(format!("Prize payout from raffle '{}'", raffle.name)),
                )
                .await?;

            credits::ActiveModel {
                raffle_id: Set(raffle.id),
                user_id: Set(*winner),
                amount: Set(outcome.prize_per_winner),
                position: Set((idx + 1) as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        log::info!(
            "Raffle {} completed: {} winner(s), {} tickets each",
            raffle.id,
            outcome.winners.len(),
            outcome.prize_per_winner
        );

        Ok(DrawResultResponse {
            raffle_id: raffle.id,
            status: RaffleStatus::Completed,
            winners: outcome.winners,
            prize_per_winner: outcome.prize_per_winner,
        })
    }

    /// 零条目活动的终态: 无中奖者、无派奖, 照常发布种子
    async fn finalize_empty(&self, raffle_id: i64) -> AppResult<DrawResultResponse> {
        let seed = ledgers::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .map(|l| l.server_seed);

        let empty_winners = serde_json::to_value(Vec::<i64>::new())?;
        let result = raffles::Entity::update_many()
            .col_expr(raffles::Column::Status, RaffleStatus::Completed.as_enum())
            .col_expr(raffles::Column::Winners, Expr::value(empty_winners))
            .col_expr(raffles::Column::ServerSeed, Expr::value(seed))
            .col_expr(raffles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(raffles::Column::Id.eq(raffle_id))
            .filter(raffles::Column::Status.eq(RaffleStatus::Drawing))
            .exec(&self.pool)
            .await?;

        if result.rows_affected != 1 {
            return self.completed_result(raffle_id).await;
        }

        log::info!("Raffle {raffle_id} completed with no entries");
        Ok(DrawResultResponse {
            raffle_id,
            status: RaffleStatus::Completed,
            winners: Vec::new(),
            prize_per_winner: 0,
        })
    }

    /// 已完赛活动的幂等返回 (重复触发开奖时)
    async fn completed_result(&self, raffle_id: i64) -> AppResult<DrawResultResponse> {
        let raffle = self.find_raffle(raffle_id).await?;
        let winners: Vec<i64> = match &raffle.winners {
            Some(json) => serde_json::from_value(json.clone())?,
            None => Vec::new(),
        };
        let prize_per_winner = credits::Entity::find()
            .filter(credits::Column::RaffleId.eq(raffle_id))
            .order_by(credits::Column::Position, Order::Asc)
            .one(&self.pool)
            .await?
            .map(|c| c.amount)
            .unwrap_or(0);

        Ok(DrawResultResponse {
            raffle_id,
            status: raffle.status,
            winners,
            prize_per_winner,
        })
    }

    async fn revert_to_active(&self, raffle_id: i64) -> AppResult<()> {
        raffles::Entity::update_many()
            .col_expr(raffles::Column::Status, RaffleStatus::Active.as_enum())
            .col_expr(raffles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(raffles::Column::Id.eq(raffle_id))
            .filter(raffles::Column::Status.eq(RaffleStatus::Drawing))
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    // -----------------------------
    // 复核
    // -----------------------------

    /// 用已发布的种子离线式重算中奖者并与存档对比。
    /// 任何持有种子与条目的人都能在库外做同样的复算。
    pub async fn verify_draw(&self, raffle_id: i64) -> AppResult<VerifyDrawResponse> {
        let raffle = self.find_raffle(raffle_id).await?;
        if raffle.status != RaffleStatus::Completed {
            return Err(AppError::ValidationError(
                "Raffle has not completed yet".to_string(),
            ));
        }
        let server_seed = raffle.server_seed.clone().ok_or_else(|| {
            AppError::InternalError(format!("Completed raffle {raffle_id} has no published seed"))
        })?;
        let stored_winners: Vec<i64> = match &raffle.winners {
            Some(json) => serde_json::from_value(json.clone())?,
            None => Vec::new(),
        };

        let ledger = ledgers::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Ledger snapshot missing for raffle {raffle_id}"))
            })?;
        let rows: Vec<LedgerEntryRow> = serde_json::from_value(ledger.entries)?;
        let mut entry_pairs: Vec<(i64, i64)> = rows
            .into_iter()
            .map(|r| (r.user_id, r.ticket_count))
            .collect();
        entry_pairs.sort();

        let recomputed_winners = select_winners(
            &entry_pairs,
            raffle.winner_count.max(1) as usize,
            &server_seed,
            raffle_id,
        );

        let matches = stored_winners == recomputed_winners;
        Ok(VerifyDrawResponse {
            raffle_id,
            server_seed,
            stored_winners,
            recomputed_winners,
            matches,
        })
    }

    // -----------------------------
    // 管理端操作
    // -----------------------------

    /// 创建活动 (始终以 upcoming 入库, 生命周期扫描负责激活)
    pub async fn create_raffle(&self, req: &CreateRaffleRequest) -> AppResult<RaffleSummary> {
        validate_create(req)?;

        let model = raffles::ActiveModel {
            name: Set(req.name.clone()),
            description: Set(req.description.clone()),
            prize_pool: Set(req.prize_pool),
            ticket_cost: Set(req.ticket_cost),
            max_entries_per_user: Set(req.max_entries_per_user),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            draw_time: Set(req.draw_time),
            winner_count: Set(req.winner_count),
            status: Set(RaffleStatus::Upcoming),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        // 种子在创建时生成并随快照持久化; 完赛时才发布到活动行
        self.actors
            .init(model.id, &generate_server_seed())
            .await?;

        log::info!("Raffle created: id={} name='{}'", model.id, model.name);
        Ok(model.into())
    }

    /// 奖池注资: 奖池的唯一合法变更途径, 完赛后拒绝
    pub async fn fund_prize_pool(&self, raffle_id: i64, amount: i64) -> AppResult<RaffleSummary> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Funding amount must be positive".to_string(),
            ));
        }

        let result = raffles::Entity::update_many()
            .col_expr(
                raffles::Column::PrizePool,
                Expr::col(raffles::Column::PrizePool).add(amount),
            )
            .col_expr(raffles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(raffles::Column::Id.eq(raffle_id))
            .filter(
                raffles::Column::Status.is_in([RaffleStatus::Upcoming, RaffleStatus::Active]),
            )
            .exec(&self.pool)
            .await?;

        if result.rows_affected != 1 {
            let raffle = self.find_raffle(raffle_id).await?;
            return Err(AppError::RaffleNotActive(format!(
                "Raffle '{}' can no longer be funded (status: {})",
                raffle.name, raffle.status
            )));
        }

        let raffle = self.find_raffle(raffle_id).await?;
        Ok(raffle.into())
    }

    // -----------------------------
    // 调度器入口
    // -----------------------------

    /// upcoming -> active (start_time 已到), 返回激活条数
    pub async fn activate_due(&self) -> AppResult<u64> {
        let result = raffles::Entity::update_many()
            .col_expr(raffles::Column::Status, RaffleStatus::Active.as_enum())
            .col_expr(raffles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(raffles::Column::Status.eq(RaffleStatus::Upcoming))
            .filter(raffles::Column::StartTime.lte(Utc::now()))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    /// 开奖时间已到的活动 id (含 drawing 态的崩溃恢复对象)
    pub async fn due_draw_ids(&self) -> AppResult<Vec<i64>> {
        let rows = raffles::Entity::find()
            .filter(
                raffles::Column::Status.is_in([RaffleStatus::Active, RaffleStatus::Drawing]),
            )
            .filter(raffles::Column::DrawTime.lte(Utc::now()))
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    /// 维持最低在售活动数, 不足则从模板随机补给, 返回创建条数
    pub async fn maintain_supply(&self, min_open: u64) -> AppResult<u64> {
        let open_count = raffles::Entity::find()
            .filter(
                raffles::Column::Status.is_in([RaffleStatus::Upcoming, RaffleStatus::Active]),
            )
            .count(&self.pool)
            .await?;

        let mut created = 0u64;
        while open_count + created < min_open {
            let req = roll_template(&mut rand::thread_rng());
            self.create_raffle(&req).await?;
            created += 1;
        }
        Ok(created)
    }

    /// actor 账本观测: (不同入场者数, 总票数), 只读不落任何状态
    pub async fn actor_status(&self, raffle_id: i64) -> AppResult<RaffleActorStatusResponse> {
        // 确认活动存在, 让 404 语义与其它接口一致
        self.find_raffle(raffle_id).await?;
        let (entrant_count, total_tickets) = self.actors.status(raffle_id).await?;
        Ok(RaffleActorStatusResponse {
            raffle_id,
            entrant_count,
            total_tickets,
        })
    }

    async fn find_raffle(&self, raffle_id: i64) -> AppResult<raffles::Model> {
        raffles::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Raffle {raffle_id} not found")))
    }
}

/// 入场成本 = 单价 * 票数 (溢出按校验错误处理)
fn entry_cost(ticket_cost: i64, tickets: i64) -> AppResult<i64> {
    ticket_cost
        .checked_mul(tickets)
        .ok_or_else(|| AppError::ValidationError("Entry cost overflows".to_string()))
}

/// 每用户上限: existing + requested <= max
fn check_entry_cap(existing: i64, requested: i64, max: i64) -> AppResult<()> {
    if existing.saturating_add(requested) > max {
        return Err(AppError::ExceedsMaxEntries(format!(
            "Raffle allows at most {max} tickets per user"
        )));
    }
    Ok(())
}

/// 从模板集随机生成一份创建请求
fn roll_template<R: Rng>(rng: &mut R) -> CreateRaffleRequest {
    let template = &RAFFLE_TEMPLATES[rng.gen_range(0..RAFFLE_TEMPLATES.len())];
    let now = Utc::now();
    let duration = rng.gen_range(template.duration_minutes.0..=template.duration_minutes.1);
    let prize_pool = rng.gen_range(template.prize_pool.0..=template.prize_pool.1);

    CreateRaffleRequest {
        name: template.name.to_string(),
        description: Some(template.description.to_string()),
        prize_pool,
        ticket_cost: template.ticket_cost,
        max_entries_per_user: template.max_entries_per_user,
        start_time: now,
        end_time: now + Duration::minutes(duration),
        // 开奖留出入场截止后的缓冲
        draw_time: now + Duration::minutes(duration + 2),
        winner_count: template.winner_count,
    }
}

fn validate_create(req: &CreateRaffleRequest) -> AppResult<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    if req.prize_pool < 0 {
        return Err(AppError::ValidationError(
            "Prize pool cannot be negative".to_string(),
        ));
    }
    if req.ticket_cost <= 0 {
        return Err(AppError::ValidationError(
            "Ticket cost must be positive".to_string(),
        ));
    }
    if req.max_entries_per_user <= 0 {
        return Err(AppError::ValidationError(
            "Max entries per user must be positive".to_string(),
        ));
    }
    if req.winner_count < 1 {
        return Err(AppError::ValidationError(
            "Winner count must be at least 1".to_string(),
        ));
    }
    // 时序约束: draw_time >= end_time >= start_time
    if req.end_time < req.start_time || req.draw_time < req.end_time {
        return Err(AppError::ValidationError(
            "Required ordering: start_time <= end_time <= draw_time".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_entry_cost() {
        assert_eq!(entry_cost(10, 5).unwrap(), 50);
        assert!(entry_cost(i64::MAX, 2).is_err());
    }

    #[test]
    fn test_entry_cap_enforced() {
        assert!(check_entry_cap(5, 5, 10).is_ok());
        match check_entry_cap(6, 5, 10) {
            Err(AppError::ExceedsMaxEntries(_)) => {}
            other => panic!("expected ExceedsMaxEntries, got {other:?}"),
        }
    }

    #[test]
    fn test_rolled_template_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let req = roll_template(&mut rng);
            validate_create(&req).unwrap();
            assert!(req.start_time <= req.end_time);
            assert!(req.end_time <= req.draw_time);
            assert!(req.prize_pool > 0);
        }
    }

    #[test]
    fn test_validate_create_rejects_bad_timing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut req = roll_template(&mut rng);
        req.draw_time = req.start_time - Duration::minutes(1);
        assert!(validate_create(&req).is_err());
    }

    #[test]
    fn test_validate_create_rejects_zero_winner_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut req = roll_template(&mut rng);
        req.winner_count = 0;
        assert!(validate_create(&req).is_err());
    }
}
