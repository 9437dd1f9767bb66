//! 持久化端口
//!
//! 处理器只依赖 [`PerkStore`]，具体后端（Postgres / 内存）在启动时注入。
//! 唯一性与排序都由后端负责。

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::model::{NewPerk, Perk, PerkPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    /// 唯一约束冲突（同一 merchant 重复）
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PerkStore: Send + Sync {
    /// 全部记录，按 `created_at` 倒序
    async fn list(&self) -> StoreResult<Vec<Perk>>;
    /// 标题精确匹配，按 `created_at` 倒序
    async fn find_by_title(&self, title: &str) -> StoreResult<Vec<Perk>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Perk>>;
    async fn create(&self, perk: NewPerk) -> StoreResult<Perk>;
    /// 部分合并更新，返回更新后的记录；记录不存在时返回 `None`
    async fn update(&self, id: Uuid, patch: PerkPatch) -> StoreResult<Option<Perk>>;
    /// 返回是否真的删除了记录
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
