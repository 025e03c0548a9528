use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 全局奖励倍率实体 (带时间窗口)
/// multiplier_bp 使用 basis points: 10000 = 1.0x
/// 奖励计算方只读, 管理端写入, 调度器负责过期
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "boosts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub multiplier_bp: i32,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 当前时刻是否生效
    pub fn is_current_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now >= self.starts_at && now < self.expires_at
    }

    /// 对基础数额应用倍率 (向下取整)
    pub fn apply(&self, base: i64) -> i64 {
        base * self.multiplier_bp as i64 / 10000
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn boost(bp: i32, active: bool) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            multiplier_bp: bp,
            starts_at: now - Duration::hours(1),
            expires_at: now + Duration::hours(1),
            is_active: active,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_apply_rounds_down() {
        let b = boost(15000, true);
        assert_eq!(b.apply(100), 150);
        assert_eq!(b.apply(3), 4); // 3 * 1.5 = 4.5 -> 4
        assert_eq!(b.apply(0), 0);
    }

    #[test]
    fn test_window_checks() {
        let now = Utc::now();
        assert!(boost(12000, true).is_current_at(now));
        assert!(!boost(12000, false).is_current_at(now));

        let mut expired = boost(12000, true);
        expired.expires_at = now - Duration::minutes(1);
        assert!(!expired.is_current_at(now));
    }
}
