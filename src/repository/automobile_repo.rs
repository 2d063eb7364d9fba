use async_trait::async_trait;
use sqlx::PgPool;

use super::errors::StoreError;
use super::store::{AutomobileStore, PageRequest};
use crate::models::Automobile;

#[derive(Clone)]
pub struct AutomobileRepository {
    pool: PgPool,
}

impl AutomobileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, automobile: &Automobile) -> Result<Automobile, sqlx::Error> {
        sqlx::query_as::<_, Automobile>(
            "INSERT INTO automobiles (name, color, creation_date, update_date, original, deleted)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, name, color, creation_date, update_date, original, deleted",
        )
        .bind(&automobile.name)
        .bind(&automobile.color)
        .bind(automobile.creation_date)
        .bind(automobile.update_date)
        .bind(automobile.original)
        .bind(automobile.deleted)
        .fetch_one(&self.pool)
        .await
    }

    async fn upsert(&self, id: i64, automobile: &Automobile) -> Result<Automobile, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, Automobile>(
            "INSERT INTO automobiles (id, name, color, creation_date, update_date, original, deleted)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                color = EXCLUDED.color,
                creation_date = EXCLUDED.creation_date,
                update_date = EXCLUDED.update_date,
                original = EXCLUDED.original,
                deleted = EXCLUDED.deleted
             RETURNING id, name, color, creation_date, update_date, original, deleted",
        )
        .bind(id)
        .bind(&automobile.name)
        .bind(&automobile.color)
        .bind(automobile.creation_date)
        .bind(automobile.update_date)
        .bind(automobile.original)
        .bind(automobile.deleted)
        .fetch_one(&mut *tx)
        .await?;

        // Explicit ids bypass the sequence. Only ever move it forward, ids handed
        // out to still-open transactions must never be issued twice.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('automobiles', 'id'), $1)
             FROM automobiles_id_seq
             WHERE $1 > last_value OR (NOT is_called AND $1 = last_value)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl AutomobileStore for AutomobileRepository {
    async fn save(&self, automobile: Automobile) -> Result<Automobile, StoreError> {
        let saved = match automobile.id {
            Some(id) => self.upsert(id, &automobile).await?,
            None => self.insert(&automobile).await?,
        };
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Automobile>, StoreError> {
        let automobile = sqlx::query_as::<_, Automobile>(
            "SELECT id, name, color, creation_date, update_date, original, deleted
             FROM automobiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(automobile)
    }

    async fn find_all(&self) -> Result<Vec<Automobile>, StoreError> {
        let automobiles = sqlx::query_as::<_, Automobile>(
            "SELECT id, name, color, creation_date, update_date, original, deleted
             FROM automobiles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(automobiles)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Automobile>, StoreError> {
        let automobiles = sqlx::query_as::<_, Automobile>(
            "SELECT id, name, color, creation_date, update_date, original, deleted
             FROM automobiles WHERE name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(automobiles)
    }

    async fn find_by_color(&self, color: &str) -> Result<Vec<Automobile>, StoreError> {
        let automobiles = sqlx::query_as::<_, Automobile>(
            "SELECT id, name, color, creation_date, update_date, original, deleted
             FROM automobiles WHERE color = $1 ORDER BY id",
        )
        .bind(color)
        .fetch_all(&self.pool)
        .await?;
        Ok(automobiles)
    }

    async fn find_by_name_and_color(
        &self,
        name: &str,
        color: &str,
    ) -> Result<Vec<Automobile>, StoreError> {
        let automobiles = sqlx::query_as::<_, Automobile>(
            "SELECT id, name, color, creation_date, update_date, original, deleted
             FROM automobiles WHERE name = $1 AND color = $2 ORDER BY id",
        )
        .bind(name)
        .bind(color)
        .fetch_all(&self.pool)
        .await?;
        Ok(automobiles)
    }

    async fn find_by_color_starts_with(
        &self,
        prefix: &str,
        page: PageRequest,
    ) -> Result<Vec<Automobile>, StoreError> {
        let pattern = format!("{}%", escape_like(prefix));
        let automobiles = sqlx::query_as::<_, Automobile>(
            "SELECT id, name, color, creation_date, update_date, original, deleted
             FROM automobiles WHERE color LIKE $1 ESCAPE '\\'
             ORDER BY color COLLATE \"C\" ASC, id ASC LIMIT $2 OFFSET $3",
        )
        .bind(pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(automobiles)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM automobiles")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
