use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Implement, ImplementRequest};
use crate::repository::ImplementRepository;
use crate::utils::error::AppResult;

const SQL_SELECT_IMPLEMENTS: &str = r#"
SELECT id, name, instrument, stock, created_at, updated_at
FROM implements
ORDER BY instrument ASC, name ASC
"#;

const SQL_SELECT_IMPLEMENT: &str = r#"
SELECT id, name, instrument, stock, created_at, updated_at
FROM implements
WHERE id = $1
"#;

const SQL_INSERT_IMPLEMENT: &str = r#"
INSERT INTO implements (id, name, instrument, stock, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $5)
RETURNING id, name, instrument, stock, created_at, updated_at
"#;

const SQL_UPDATE_IMPLEMENT: &str = r#"
UPDATE implements
SET name = $2,
    instrument = $3,
    stock = $4,
    updated_at = $5
WHERE id = $1
RETURNING id, name, instrument, stock, created_at, updated_at
"#;

const SQL_DELETE_IMPLEMENT: &str = r#"
DELETE FROM implements
WHERE id = $1
RETURNING id, name, instrument, stock, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgImplementRepository {
    pool: PgPool,
}

impl PgImplementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImplementRepository for PgImplementRepository {
    async fn list(&self) -> AppResult<Vec<Implement>> {
        let implements = sqlx::query_as::<_, Implement>(SQL_SELECT_IMPLEMENTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(implements)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Implement>> {
        let implement = sqlx::query_as::<_, Implement>(SQL_SELECT_IMPLEMENT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(implement)
    }

    async fn create(&self, implement: &ImplementRequest) -> AppResult<Implement> {
        let created = sqlx::query_as::<_, Implement>(SQL_INSERT_IMPLEMENT)
            .bind(Uuid::new_v4())
            .bind(implement.name.trim())
            .bind(implement.instrument.trim())
            .bind(implement.stock)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, implement: &ImplementRequest) -> AppResult<Option<Implement>> {
        let updated = sqlx::query_as::<_, Implement>(SQL_UPDATE_IMPLEMENT)
            .bind(id)
            .bind(implement.name.trim())
            .bind(implement.instrument.trim())
            .bind(implement.stock)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Implement>> {
        let deleted = sqlx::query_as::<_, Implement>(SQL_DELETE_IMPLEMENT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted)
    }
}
