//! Deterministic weighted winner selection.
//!
//! The entire draw is a pure function of `(entries, winner_count, seed,
//! raffle_id)`: the shuffle consumes an md5-derived hash stream instead of a
//! thread-local RNG, so anyone holding the published seed can recompute a
//! completed draw and get byte-identical winners. 调用前置条件:
//! - 每个 user_id 至多出现一行 (上游 merge-add 保证); 重复行会使该用户权重翻倍
//! - 单个活动的总票数必须被上游限制在合理范围内 (<= 10,000,000),
//!   否则加权池展开会占用过量内存
//! - entries 需按稳定顺序传入 (actor 按 user_id 升序提供)

use std::collections::HashSet;

/// 按票数加权随机选出 `winner_count` 个互不相同的中奖者, 有序。
///
/// 算法 (复核方需要精确复现):
/// 1. 加权池展开: 每个 user_id 重复 ticket_count 次
/// 2. Fisher-Yates: i 从 len-1 递减到 1, u = hash_unit(seed, raffle_id, i),
///    j = floor(u * (i + 1)), 交换 pool[i] 与 pool[j]
/// 3. 从前向后收集不重复的 user_id, 直到凑满 winner_count 或池耗尽
///
/// 条目为空或 winner_count 为 0 时返回空列表; 不同中奖者少于 winner_count
/// 时所有入场者按首次出现顺序全部中奖。
pub fn select_winners(
    entries: &[(i64, i64)],
    winner_count: usize,
    seed: &str,
    raffle_id: i64,
) -> Vec<i64> {
    if entries.is_empty() || winner_count == 0 {
        return Vec::new();
    }

    let mut pool: Vec<i64> = Vec::new();
    for &(user_id, ticket_count) in entries {
        for _ in 0..ticket_count.max(0) {
            pool.push(user_id);
        }
    }
    if pool.is_empty() {
        return Vec::new();
    }

    for i in (1..pool.len()).rev() {
        let u = hash_unit(seed, raffle_id, i as u64);
        let j = (u * (i as f64 + 1.0)) as usize;
        pool.swap(i, j);
    }

    let mut seen = HashSet::new();
    let mut winners = Vec::new();
    for user_id in pool {
        if seen.insert(user_id) {
            winners.push(user_id);
            if winners.len() == winner_count {
                break;
            }
        }
    }
    winners
}

/// md5(seed ‖ raffle_id ‖ position) 规约到 [0, 1)。
/// 取摘要前 8 字节的高 53 位作尾数, 商严格小于 1.0, j 不会越界。
fn hash_unit(seed: &str, raffle_id: i64, position: u64) -> f64 {
    let digest = md5::compute(format!("{seed}{raffle_id}{position}"));
    let mut x: u64 = 0;
    for b in &digest.0[..8] {
        x = (x << 8) | *b as u64;
    }
    ((x >> 11) as f64) / 9_007_199_254_740_992.0 // 2^53
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let entries = vec![(1i64, 5i64), (2, 3), (3, 10)];
        let a = select_winners(&entries, 2, "seed-a", 77);
        let b = select_winners(&entries, 2, "seed-a", 77);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_duplicate_winners() {
        let entries = vec![(1i64, 50i64), (2, 50), (3, 50), (4, 50)];
        for s in 0..50 {
            let winners = select_winners(&entries, 3, &format!("s{s}"), 9);
            let unique: HashSet<_> = winners.iter().collect();
            assert_eq!(unique.len(), winners.len());
        }
    }

    #[test]
    fn test_winner_count_bound() {
        let entries = vec![(1i64, 5i64), (2, 3), (3, 10)];
        assert_eq!(select_winners(&entries, 2, "s", 1).len(), 2);
        // 不同中奖者数 = min(winner_count, 入场者数)
        assert_eq!(select_winners(&entries, 10, "s", 1).len(), 3);
    }

    #[test]
    fn test_undersubscribed_all_win() {
        let entries = vec![(7i64, 1i64), (8, 2), (9, 3)];
        let winners = select_winners(&entries, 5, "any-seed", 42);
        let got: HashSet<_> = winners.iter().copied().collect();
        assert_eq!(got, HashSet::from([7, 8, 9]));
    }

    #[test]
    fn test_empty_entries() {
        assert!(select_winners(&[], 3, "seed", 1).is_empty());
    }

    #[test]
    fn test_zero_winner_count() {
        let entries = vec![(1i64, 5i64)];
        assert!(select_winners(&entries, 0, "seed", 1).is_empty());
    }

    #[test]
    fn test_single_entrant_always_wins() {
        for s in 0..20 {
            assert_eq!(select_winners(&[(42, 7)], 1, &format!("s{s}"), 5), vec![42]);
        }
    }

    /// 统计性权重检验: (A,1) vs (B,99), 500 个种子下 B 应当占绝对多数。
    #[test]
    fn test_weighting_statistical() {
        let entries = vec![(1i64, 1i64), (2, 99)];
        let mut b_wins = 0;
        for s in 0..500 {
            let winners = select_winners(&entries, 1, &format!("seed{s}"), 123);
            if winners == vec![2] {
                b_wins += 1;
            }
        }
        assert!(b_wins > 400, "B won only {b_wins}/500");
    }

    /// 固定向量回归: 锁定哈希流与洗牌的精确算法。
    /// 任何改动 (分隔符/字节序/规约方式/交换索引) 都会改变已发布
    /// 活动的复核结果, 必须视为破坏性变更。
    #[test]
    fn test_pinned_vector() {
        let entries = vec![(101i64, 3i64), (202, 2), (303, 1)];
        let winners = select_winners(&entries, 3, "s1", 42);
        assert_eq!(winners, vec![101, 303, 202]);
    }
}
