//! Perk 业务服务
//!
//! 在处理器和存储之间做结果映射：存储的冲突只在创建时识别为重复，
//! 其余失败一律交给统一的错误通道。

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{NewPerk, Perk, PerkPatch};
use super::store::{PerkStore, StoreError};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct PerkService {
    store: Arc<dyn PerkStore>,
}

fn unclassified(err: StoreError) -> CoreError {
    CoreError::Unclassified(anyhow::Error::new(err))
}

impl PerkService {
    pub fn new(store: Arc<dyn PerkStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn list_perks(&self) -> Result<Vec<Perk>, CoreError> {
        let perks = self.store.list().await.map_err(unclassified)?;
        debug!(count = perks.len(), "Listed perks");
        Ok(perks)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Vec<Perk>, CoreError> {
        let perks = self.store.find_by_title(title).await.map_err(unclassified)?;
        debug!(title, count = perks.len(), "Filtered perks by title");
        Ok(perks)
    }

    pub async fn get_perk(&self, id: Uuid) -> Result<Perk, CoreError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(unclassified)?
            .ok_or_else(CoreError::perk_not_found)
    }

    pub async fn create_perk(&self, new_perk: NewPerk) -> Result<Perk, CoreError> {
        let perk = self.store.create(new_perk).await.map_err(|err| match err {
            StoreError::Conflict(_) => CoreError::duplicate_perk(),
            other => unclassified(other),
        })?;
        info!(perk_id = %perk.id, title = %perk.title, "Created perk");
        Ok(perk)
    }

    /// 更新时的唯一冲突不做特殊处理，按未分类错误上抛
    pub async fn update_perk(&self, id: Uuid, patch: PerkPatch) -> Result<Perk, CoreError> {
        let perk = self
            .store
            .update(id, patch)
            .await
            .map_err(unclassified)?
            .ok_or_else(CoreError::perk_not_found)?;
        info!(perk_id = %perk.id, "Updated perk");
        Ok(perk)
    }

    pub async fn delete_perk(&self, id: Uuid) -> Result<(), CoreError> {
        if !self.store.delete(id).await.map_err(unclassified)? {
            return Err(CoreError::perk_not_found());
        }
        info!(perk_id = %id, "Deleted perk");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), CoreError> {
        self.store
            .health_check()
            .await
            .map_err(|err| CoreError::Unavailable(format!("storage unavailable: {err}")))
    }
}
