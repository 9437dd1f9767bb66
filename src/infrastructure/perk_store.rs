//! Postgres 后端的 [`PerkStore`] 实现

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::app::perk::model::{Category, NewPerk, Perk, PerkPatch};
use crate::app::perk::store::{PerkStore, StoreError, StoreResult};

const SELECT_COLUMNS: &str =
    "id, title, description, category, discount_percent, merchant, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct PerkRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    category: String,
    discount_percent: f64,
    merchant: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PerkRow> for Perk {
    type Error = StoreError;

    fn try_from(row: PerkRow) -> Result<Self, Self::Error> {
        let category: Category = row
            .category
            .parse()
            .with_context(|| format!("perk {} has invalid category", row.id))?;
        Ok(Perk {
            id: row.id,
            title: row.title,
            description: row.description,
            category,
            discount_percent: row.discount_percent,
            merchant: row.merchant,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_perks(rows: Vec<PerkRow>) -> StoreResult<Vec<Perk>> {
    rows.into_iter().map(Perk::try_from).collect()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

fn write_error(err: sqlx::Error, op: &'static str) -> StoreError {
    if is_unique_violation(&err) {
        return StoreError::Conflict("merchant exists".into());
    }
    StoreError::Unexpected(anyhow::Error::new(err).context(op))
}

#[derive(Clone)]
pub struct PgPerkStore {
    pool: PgPool,
}

impl PgPerkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PerkStore for PgPerkStore {
    async fn list(&self) -> StoreResult<Vec<Perk>> {
        let rows = sqlx::query_as::<_, PerkRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM perks ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("list perks failed")?;
        rows_to_perks(rows)
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Vec<Perk>> {
        let rows = sqlx::query_as::<_, PerkRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM perks WHERE title = $1 ORDER BY created_at DESC"
        ))
        .bind(title)
        .fetch_all(&self.pool)
        .await
        .context("find perks by title failed")?;
        rows_to_perks(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Perk>> {
        let row = sqlx::query_as::<_, PerkRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM perks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find perk by id failed")?;
        row.map(Perk::try_from).transpose()
    }

    async fn create(&self, perk: NewPerk) -> StoreResult<Perk> {
        let row = sqlx::query_as::<_, PerkRow>(&format!(
            r#"INSERT INTO perks (id, title, description, category, discount_percent, merchant)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(Uuid::new_v4())
        .bind(&perk.title)
        .bind(&perk.description)
        .bind(perk.category.as_str())
        .bind(perk.discount_percent)
        .bind(&perk.merchant)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| write_error(err, "insert perk failed"))?;
        row.try_into()
    }

    async fn update(&self, id: Uuid, patch: PerkPatch) -> StoreResult<Option<Perk>> {
        let row = sqlx::query_as::<_, PerkRow>(&format!(
            r#"UPDATE perks SET
                   title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   category = COALESCE($4, category),
                   discount_percent = COALESCE($5, discount_percent),
                   merchant = COALESCE($6, merchant),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.discount_percent)
        .bind(&patch.merchant)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| write_error(err, "update perk failed"))?;
        row.map(Perk::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM perks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete perk failed")?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("database ping failed")?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
