use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Instrument, InstrumentRequest};
use crate::repository::{AssignmentOutcome, InstrumentRepository};
use crate::utils::error::{AppError, AppResult};

const SQL_SELECT_INSTRUMENTS: &str = r#"
SELECT id, name, brand, condition, kind, assigned_to, created_at, updated_at
FROM instruments
ORDER BY name ASC, id ASC
"#;

const SQL_SELECT_INSTRUMENT: &str = r#"
SELECT id, name, brand, condition, kind, assigned_to, created_at, updated_at
FROM instruments
WHERE id = $1
"#;

const SQL_INSERT_INSTRUMENT: &str = r#"
INSERT INTO instruments (id, name, brand, condition, kind, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $6)
RETURNING id, name, brand, condition, kind, assigned_to, created_at, updated_at
"#;

const SQL_UPDATE_INSTRUMENT: &str = r#"
UPDATE instruments
SET name = $2,
    brand = $3,
    condition = $4,
    kind = $5,
    updated_at = $6
WHERE id = $1
RETURNING id, name, brand, condition, kind, assigned_to, created_at, updated_at
"#;

const SQL_DELETE_INSTRUMENT: &str = r#"
DELETE FROM instruments
WHERE id = $1
RETURNING id, name, brand, condition, kind, assigned_to, created_at, updated_at
"#;

const SQL_ASSIGN_INSTRUMENT: &str = r#"
UPDATE instruments
SET assigned_to = $2,
    updated_at = $3
WHERE id = $1 AND assigned_to IS NULL
RETURNING id, name, brand, condition, kind, assigned_to, created_at, updated_at
"#;

const SQL_UNASSIGN_INSTRUMENT: &str = r#"
UPDATE instruments
SET assigned_to = NULL,
    updated_at = $2
WHERE id = $1 AND assigned_to IS NOT NULL
RETURNING id, name, brand, condition, kind, assigned_to, created_at, updated_at
"#;

const SQL_INSTRUMENT_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM instruments WHERE id = $1)";

#[derive(Clone)]
pub struct PgInstrumentRepository {
    pool: PgPool,
}

impl PgInstrumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn outcome(&self, id: Uuid, updated: Option<Instrument>) -> AppResult<AssignmentOutcome> {
        if let Some(instrument) = updated {
            return Ok(AssignmentOutcome::Updated(instrument));
        }

        let (exists,): (bool,) = sqlx::query_as(SQL_INSTRUMENT_EXISTS)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists {
            AssignmentOutcome::Unchanged
        } else {
            AssignmentOutcome::NotFound
        })
    }
}

#[async_trait]
impl InstrumentRepository for PgInstrumentRepository {
    async fn list(&self) -> AppResult<Vec<Instrument>> {
        let instruments = sqlx::query_as::<_, Instrument>(SQL_SELECT_INSTRUMENTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(instruments)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Instrument>> {
        let instrument = sqlx::query_as::<_, Instrument>(SQL_SELECT_INSTRUMENT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(instrument)
    }

    async fn create(&self, instrument: &InstrumentRequest) -> AppResult<Instrument> {
        let created = sqlx::query_as::<_, Instrument>(SQL_INSERT_INSTRUMENT)
            .bind(Uuid::new_v4())
            .bind(instrument.name.trim())
            .bind(instrument.brand.trim())
            .bind(instrument.condition.trim())
            .bind(instrument.kind.trim())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        instrument: &InstrumentRequest,
    ) -> AppResult<Option<Instrument>> {
        let updated = sqlx::query_as::<_, Instrument>(SQL_UPDATE_INSTRUMENT)
            .bind(id)
            .bind(instrument.name.trim())
            .bind(instrument.brand.trim())
            .bind(instrument.condition.trim())
            .bind(instrument.kind.trim())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Instrument>> {
        let deleted = sqlx::query_as::<_, Instrument>(SQL_DELETE_INSTRUMENT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted)
    }

    async fn assign(&self, id: Uuid, member_id: Uuid) -> AppResult<AssignmentOutcome> {
        let updated = sqlx::query_as::<_, Instrument>(SQL_ASSIGN_INSTRUMENT)
            .bind(id)
            .bind(member_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                // Member removed between the handler's check and this update
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::NotFound("No member was found with the provided id.".to_string())
                }
                _ => AppError::DatabaseError(e),
            })?;

        self.outcome(id, updated).await
    }

    async fn unassign(&self, id: Uuid) -> AppResult<AssignmentOutcome> {
        let updated = sqlx::query_as::<_, Instrument>(SQL_UNASSIGN_INSTRUMENT)
            .bind(id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        self.outcome(id, updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::member_repo::tests::seed_band;
    use crate::repository::{MemberRepository, PgMemberRepository};

    fn snare() -> InstrumentRequest {
        InstrumentRequest {
            name: " Snare drum ".to_string(),
            brand: "Pearl".to_string(),
            condition: "good".to_string(),
            kind: "percussion".to_string(),
        }
    }

    fn assigned(outcome: AssignmentOutcome) -> Option<Uuid> {
        match outcome {
            AssignmentOutcome::Updated(instrument) => instrument.assigned_to,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[sqlx::test]
    async fn test_assignment_is_conditional(pool: PgPool) {
        let members = PgMemberRepository::new(pool.clone());
        let (_, m1, m2) = seed_band(&members).await;
        let repo = PgInstrumentRepository::new(pool);
        let instrument = repo.create(&snare()).await.unwrap();
        assert_eq!(instrument.name, "Snare drum");

        assert_eq!(assigned(repo.assign(instrument.id, m1.id).await.unwrap()), Some(m1.id));
        assert_eq!(
            repo.assign(instrument.id, m2.id).await.unwrap(),
            AssignmentOutcome::Unchanged
        );
        let stored = repo.find_by_id(instrument.id).await.unwrap().unwrap();
        assert_eq!(stored.assigned_to, Some(m1.id));

        assert_eq!(assigned(repo.unassign(instrument.id).await.unwrap()), None);
        assert_eq!(
            repo.unassign(instrument.id).await.unwrap(),
            AssignmentOutcome::Unchanged
        );
    }

    #[sqlx::test]
    async fn test_unknown_ids(pool: PgPool) {
        let repo = PgInstrumentRepository::new(pool);
        let instrument = repo.create(&snare()).await.unwrap();

        assert_eq!(
            repo.assign(Uuid::new_v4(), Uuid::new_v4()).await.unwrap(),
            AssignmentOutcome::NotFound
        );
        assert_eq!(
            repo.unassign(Uuid::new_v4()).await.unwrap(),
            AssignmentOutcome::NotFound
        );
        assert!(matches!(
            repo.assign(instrument.id, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test]
    async fn test_deleting_member_frees_instrument(pool: PgPool) {
        let members = PgMemberRepository::new(pool.clone());
        let (_, m1, _) = seed_band(&members).await;
        let repo = PgInstrumentRepository::new(pool);
        let instrument = repo.create(&snare()).await.unwrap();
        repo.assign(instrument.id, m1.id).await.unwrap();

        members.delete(m1.id).await.unwrap().unwrap();

        let stored = repo.find_by_id(instrument.id).await.unwrap().unwrap();
        assert_eq!(stored.assigned_to, None);
    }
}
