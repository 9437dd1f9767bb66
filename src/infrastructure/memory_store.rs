//! 内存存储
//!
//! 用于本地开发与测试，进程重启后数据丢失。与 Postgres 后端保持相同的
//! merchant 唯一约束和倒序排序。

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app::perk::model::{NewPerk, Perk, PerkPatch};
use crate::app::perk::store::{PerkStore, StoreError, StoreResult};

#[derive(Debug)]
struct Entry {
    // 插入序号，用于 created_at 相同时的稳定排序
    seq: u64,
    perk: Perk,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    perks: HashMap<Uuid, Entry>,
}

impl Inner {
    fn merchant_taken(&self, merchant: &str, except: Option<Uuid>) -> bool {
        self.perks.values().any(|entry| {
            Some(entry.perk.id) != except && entry.perk.merchant.as_deref() == Some(merchant)
        })
    }

    fn newest_first<'a>(&self, entries: impl Iterator<Item = &'a Entry>) -> Vec<Perk> {
        let mut entries: Vec<&Entry> = entries.collect();
        entries.sort_by(|a, b| {
            b.perk
                .created_at
                .cmp(&a.perk.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        entries.into_iter().map(|entry| entry.perk.clone()).collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPerkStore {
    inner: RwLock<Inner>,
}

impl InMemoryPerkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PerkStore for InMemoryPerkStore {
    async fn list(&self) -> StoreResult<Vec<Perk>> {
        let inner = self.inner.read().await;
        Ok(inner.newest_first(inner.perks.values()))
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Vec<Perk>> {
        let inner = self.inner.read().await;
        Ok(inner.newest_first(inner.perks.values().filter(|entry| entry.perk.title == title)))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Perk>> {
        let inner = self.inner.read().await;
        Ok(inner.perks.get(&id).map(|entry| entry.perk.clone()))
    }

    async fn create(&self, perk: NewPerk) -> StoreResult<Perk> {
        let mut inner = self.inner.write().await;
        if let Some(merchant) = perk.merchant.as_deref() {
            if inner.merchant_taken(merchant, None) {
                return Err(StoreError::Conflict(format!("merchant {merchant} exists")));
            }
        }

        let now = Utc::now();
        let stored = Perk {
            id: Uuid::new_v4(),
            title: perk.title,
            description: perk.description,
            category: perk.category,
            discount_percent: perk.discount_percent,
            merchant: perk.merchant,
            created_at: now,
            updated_at: now,
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.perks.insert(
            stored.id,
            Entry {
                seq,
                perk: stored.clone(),
            },
        );
        Ok(stored)
    }

    async fn update(&self, id: Uuid, patch: PerkPatch) -> StoreResult<Option<Perk>> {
        let mut inner = self.inner.write().await;
        if !inner.perks.contains_key(&id) {
            return Ok(None);
        }
        if let Some(merchant) = patch.merchant.as_deref() {
            if inner.merchant_taken(merchant, Some(id)) {
                return Err(StoreError::Conflict(format!("merchant {merchant} exists")));
            }
        }

        let Some(entry) = inner.perks.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(&mut entry.perk, Utc::now());
        Ok(Some(entry.perk.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.perks.remove(&id).is_some())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
