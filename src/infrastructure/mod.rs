//! 基础设施层：日志、数据库连接与存储后端

pub mod logger;
pub mod memory_store;

#[cfg(feature = "database")]
pub mod database;
#[cfg(feature = "database")]
pub mod perk_store;

use std::sync::Arc;

use crate::app::perk::store::PerkStore;
use crate::config::{StorageBackend, StorageConfig};

#[cfg(feature = "database")]
use crate::config::DatabaseConfig;

/// 按配置构造存储后端
#[cfg(feature = "database")]
pub async fn build_store(
    storage: &StorageConfig,
    database: &DatabaseConfig,
) -> anyhow::Result<Arc<dyn PerkStore>> {
    use anyhow::Context;

    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(memory_store::InMemoryPerkStore::new())),
        StorageBackend::Postgres => {
            let manager = database::DatabaseManager::new(database)
                .await
                .context("failed to connect to database")?;
            manager
                .migrate()
                .await
                .context("failed to prepare perks schema")?;
            Ok(Arc::new(perk_store::PgPerkStore::new(
                manager.get_pool().clone(),
            )))
        }
    }
}

#[cfg(not(feature = "database"))]
pub async fn build_store(
    storage: &StorageConfig,
    _database: &crate::config::DatabaseConfig,
) -> anyhow::Result<Arc<dyn PerkStore>> {
    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(memory_store::InMemoryPerkStore::new())),
        StorageBackend::Postgres => {
            anyhow::bail!("postgres storage requires the `database` feature")
        }
    }
}
