use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 用户表实体: 本服务只拥有票券余额, 资料与登录态由上游网关负责
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    /// 票券余额 (整数票券单位, 永不为负)
    pub tickets: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
