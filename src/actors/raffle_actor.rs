//! Per-raffle single-writer actor.
//!
//! 每个活动的入场账本由且仅由一个 actor 实例拥有: 同一活动的所有
//! Enter/Draw 串行通过该活动的互斥锁, 不同活动完全并行。账本写入
//! 采用 write-through: 先持久化快照成功, 才更新内存, 冷启动不丢条目。
//! actor 身份与 raffle_id 一一对应, 跨活动从不复用。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::entities::{raffle_entity, raffle_entry_entity, raffle_ledger_entity as ledgers};
use crate::error::{AppError, AppResult};
use crate::utils::select_winners;

/// 快照中的单个条目 (与 raffle_entries 行同构)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryRow {
    pub user_id: i64,
    pub ticket_count: i64,
}

/// 开奖输出: 有序中奖者 + 单个中奖者分得的奖额
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub winners: Vec<i64>,
    pub prize_per_winner: i64,
}

/// 账本的纯内存形态: merge-add 与开奖计算都在这里, 无 I/O
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    entries: BTreeMap<i64, i64>,
    drawn: bool,
}

impl LedgerState {
    pub fn from_rows(rows: Vec<LedgerEntryRow>, drawn: bool) -> Self {
        let mut entries = BTreeMap::new();
        for row in rows {
            *entries.entry(row.user_id).or_insert(0) += row.ticket_count;
        }
        Self { entries, drawn }
    }

    /// merge-add: 已存在则累加, 否则建行。返回 (该用户累计票数, 不同入场者数)
    pub fn apply_entry(&mut self, user_id: i64, ticket_count: i64) -> (i64, i64) {
        let total = self.entries.entry(user_id).or_insert(0);
        *total += ticket_count;
        (*total, self.entries.len() as i64)
    }

    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    pub fn freeze(&mut self) {
        self.drawn = true;
    }

    pub fn entrant_count(&self) -> i64 {
        self.entries.len() as i64
    }

    pub fn total_tickets(&self) -> i64 {
        self.entries.values().sum()
    }

    /// 按 user_id 升序导出 (选择器要求稳定顺序)
    pub fn sorted_entries(&self) -> Vec<(i64, i64)> {
        self.entries.iter().map(|(u, t)| (*u, *t)).collect()
    }

    pub fn to_rows(&self) -> Vec<LedgerEntryRow> {
        self.entries
            .iter()
            .map(|(u, t)| LedgerEntryRow {
                user_id: *u,
                ticket_count: *t,
            })
            .collect()
    }

    /// 对冻结快照计算中奖者。纯函数: 同一快照重复调用输出完全一致。
    /// 空账本返回 NoEntries 信号, 由编排层转为零中奖者完赛。
    pub fn compute_draw(
        &self,
        seed: &str,
        raffle_id: i64,
        winner_count: usize,
        prize_pool: i64,
    ) -> AppResult<DrawOutcome> {
        if self.entries.is_empty() {
            return Err(AppError::NoEntries);
        }
        let winners = select_winners(&self.sorted_entries(), winner_count, seed, raffle_id);
        if winners.is_empty() {
            return Err(AppError::NoEntries);
        }
        let prize_per_winner = prize_pool / winners.len() as i64;
        Ok(DrawOutcome {
            winners,
            prize_per_winner,
        })
    }
}

/// 单个活动的 actor: 种子 + 账本, 生命周期与活动一致
pub struct RaffleActor {
    raffle_id: i64,
    server_seed: String,
    state: LedgerState,
}

/// actor 注册表: raffle_id -> Arc<Mutex<RaffleActor>>
/// 外层 map 锁只用于取/建句柄, 操作期间只持有单个活动的锁
#[derive(Clone)]
pub struct RaffleActorRegistry {
    pool: DatabaseConnection,
    actors: Arc<Mutex<HashMap<i64, Arc<Mutex<RaffleActor>>>>>,
}

impl RaffleActorRegistry {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self {
            pool,
            actors: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 幂等初始化: 持久化 {raffle_id, server_seed, entries: []}。
    /// 已存在的快照行保持原样 (种子一经写入不可变), 重复调用无副作用。
    pub async fn init(&self, raffle_id: i64, server_seed: &str) -> AppResult<()> {
        if ledgers::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Ok(());
        }

        ledgers::ActiveModel {
            raffle_id: Set(raffle_id),
            server_seed: Set(server_seed.to_string()),
            entries: Set(serde_json::to_value(Vec::<LedgerEntryRow>::new())?),
            drawn: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Raffle actor initialized: raffle_id={raffle_id}");
        Ok(())
    }

    /// 入场镜像: merge-add 后整本快照 write-through。
    /// 返回 (该用户累计票数, 不同入场者数)。
    pub async fn enter(
        &self,
        raffle_id: i64,
        user_id: i64,
        ticket_count: i64,
    ) -> AppResult<(i64, i64)> {
        if ticket_count <= 0 {
            return Err(AppError::ValidationError(
                "Ticket count must be positive".to_string(),
            ));
        }

        let handle = self.handle(raffle_id).await?;
        let mut actor = handle.lock().await;

        if actor.state.is_drawn() {
            return Err(AppError::RaffleNotActive(format!(
                "Raffle {raffle_id} ledger is frozen"
            )));
        }

        // 先在副本上变更并持久化, 成功后才提交到内存账本
        let mut next = actor.state.clone();
        let (user_total, entrant_count) = next.apply_entry(user_id, ticket_count);
        self.persist(raffle_id, &next).await?;
        actor.state = next;

        Ok((user_total, entrant_count))
    }

    /// 开奖: 对账 -> 冻结 -> 计算。对未变更账本重复调用返回相同结果。
    pub async fn draw(&self, raffle_id: i64, winner_count: usize) -> AppResult<DrawOutcome> {
        let handle = self.handle(raffle_id).await?;
        let mut actor = handle.lock().await;

        // 关系表是已扣费票数的权威记录; 镜像缺失或滞后时在此重建,
        // 保证漏镜像的条目不会被排除在开奖之外
        self.reconcile(&mut actor).await?;

        let raffle = raffle_entity::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Raffle {raffle_id} not found")))?;

        let seed = actor.server_seed.clone();
        let outcome =
            actor
                .state
                .compute_draw(&seed, raffle_id, winner_count, raffle.prize_pool)?;

        if !actor.state.is_drawn() {
            let mut frozen = actor.state.clone();
            frozen.freeze();
            self.persist(raffle_id, &frozen).await?;
            actor.state = frozen;
        }

        Ok(outcome)
    }

    /// 只读状态: (不同入场者数, 总票数)
    pub async fn status(&self, raffle_id: i64) -> AppResult<(i64, i64)> {
        let handle = self.handle(raffle_id).await?;
        let actor = handle.lock().await;
        Ok((actor.state.entrant_count(), actor.state.total_tickets()))
    }

    /// 取活动句柄, 冷启动时从持久化快照恢复账本
    async fn handle(&self, raffle_id: i64) -> AppResult<Arc<Mutex<RaffleActor>>> {
        {
            let actors = self.actors.lock().await;
            if let Some(handle) = actors.get(&raffle_id) {
                return Ok(handle.clone());
            }
        }

        let row = ledgers::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Raffle {raffle_id} ledger not initialized"))
            })?;

        let rows: Vec<LedgerEntryRow> = serde_json::from_value(row.entries)?;
        let actor = RaffleActor {
            raffle_id,
            server_seed: row.server_seed,
            state: LedgerState::from_rows(rows, row.drawn),
        };

        let mut actors = self.actors.lock().await;
        // 并发首次访问时先插入者胜出, 保持单写者身份唯一
        let handle = actors
            .entry(raffle_id)
            .or_insert_with(|| Arc::new(Mutex::new(actor)))
            .clone();
        Ok(handle)
    }

    async fn reconcile(&self, actor: &mut RaffleActor) -> AppResult<()> {
        let rows = raffle_entry_entity::Entity::find()
            .filter(raffle_entry_entity::Column::RaffleId.eq(actor.raffle_id))
            .all(&self.pool)
            .await?;

        let mut relational = BTreeMap::new();
        for row in rows {
            relational.insert(row.user_id, row.ticket_count);
        }

        if relational != actor.state.entries {
            log::warn!(
                "Ledger mirror out of sync for raffle {}: {} mirrored vs {} recorded tickets, rebuilding from store",
                actor.raffle_id,
                actor.state.total_tickets(),
                relational.values().sum::<i64>()
            );
            let mut rebuilt = actor.state.clone();
            rebuilt.entries = relational;
            self.persist(actor.raffle_id, &rebuilt).await?;
            actor.state = rebuilt;
        }

        Ok(())
    }

    /// 整本快照落盘 (upsert)。失败时调用方不得更新内存账本。
    async fn persist(&self, raffle_id: i64, state: &LedgerState) -> AppResult<()> {
        let entries_json = serde_json::to_value(state.to_rows())?;

        let existing = ledgers::Entity::find_by_id(raffle_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Raffle {raffle_id} ledger not initialized"))
            })?;

        let mut am = existing.into_active_model();
        am.entries = Set(entries_json);
        am.drawn = Set(state.is_drawn());
        am.updated_at = Set(Some(Utc::now()));
        am.update(&self.pool).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_add_accumulates() {
        let mut state = LedgerState::default();
        let (total, entrants) = state.apply_entry(7, 5);
        assert_eq!((total, entrants), (5, 1));
        let (total, entrants) = state.apply_entry(7, 3);
        assert_eq!((total, entrants), (8, 1));
        assert_eq!(state.entrant_count(), 1);
        assert_eq!(state.total_tickets(), 8);
    }

    #[test]
    fn test_status_counts_multiple_entrants() {
        let mut state = LedgerState::default();
        state.apply_entry(1, 5);
        state.apply_entry(2, 5);
        state.apply_entry(1, 2);
        assert_eq!(state.entrant_count(), 2);
        assert_eq!(state.total_tickets(), 12);
        assert_eq!(state.sorted_entries(), vec![(1, 7), (2, 5)]);
    }

    #[test]
    fn test_draw_is_repeatable() {
        let mut state = LedgerState::default();
        state.apply_entry(1, 5);
        state.apply_entry(2, 5);
        let a = state.compute_draw("s1", 1, 1, 1000).unwrap();
        let b = state.compute_draw("s1", 1, 1, 1000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_empty_ledger_is_no_entries() {
        let state = LedgerState::default();
        match state.compute_draw("seed", 1, 3, 500) {
            Err(AppError::NoEntries) => {}
            other => panic!("expected NoEntries, got {other:?}"),
        }
    }

    #[test]
    fn test_prize_per_winner_floor_division() {
        let mut state = LedgerState::default();
        state.apply_entry(1, 1);
        state.apply_entry(2, 1);
        state.apply_entry(3, 1);
        let outcome = state.compute_draw("seed", 9, 3, 1000).unwrap();
        assert_eq!(outcome.winners.len(), 3);
        assert_eq!(outcome.prize_per_winner, 333);
    }

    /// 单中奖者拿走整个 floor 后的奖池; 种子 "s1" 下 [(1,5),(2,5)]
    /// 的赢家由选择器确定且可离线复算
    #[test]
    fn test_single_winner_takes_full_pool() {
        let mut state = LedgerState::default();
        state.apply_entry(1, 5);
        state.apply_entry(2, 5);
        let outcome = state.compute_draw("s1", 1, 1, 1000).unwrap();
        assert_eq!(outcome.winners.len(), 1);
        assert_eq!(outcome.prize_per_winner, 1000);
        assert_eq!(
            outcome.winners,
            select_winners(&[(1, 5), (2, 5)], 1, "s1", 1)
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = LedgerState::default();
        state.apply_entry(10, 4);
        state.apply_entry(20, 6);
        let restored = LedgerState::from_rows(state.to_rows(), state.is_drawn());
        assert_eq!(restored.sorted_entries(), state.sorted_entries());
        assert!(!restored.is_drawn());
    }
}
