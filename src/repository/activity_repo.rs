use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::activity::ActivityRow;
use crate::models::{Activity, ActivityRequest, Participation, ParticipationChange, ParticipationStatus};
use crate::repository::ActivityRepository;
use crate::utils::error::AppResult;

const SQL_SELECT_ACTIVITIES: &str = r#"
SELECT id, title, description, activity_date, activity_time, location, created_at, updated_at
FROM activities
ORDER BY activity_date ASC, activity_time ASC, created_at ASC
"#;

const SQL_SELECT_ACTIVITY: &str = r#"
SELECT id, title, description, activity_date, activity_time, location, created_at, updated_at
FROM activities
WHERE id = $1
"#;

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (id, title, description, activity_date, activity_time, location, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
RETURNING id, title, description, activity_date, activity_time, location, created_at, updated_at
"#;

// Roster order follows the order of the member ids handed in.
const SQL_INSERT_PARTICIPANTS: &str = r#"
INSERT INTO activity_participants (activity_id, member_id, position)
SELECT $1, roster.member_id, roster.ordinal::INT
FROM UNNEST($2::UUID[]) WITH ORDINALITY AS roster(member_id, ordinal)
"#;

const SQL_UPDATE_ACTIVITY: &str = r#"
UPDATE activities
SET title = $2,
    description = $3,
    activity_date = $4,
    activity_time = $5,
    location = $6,
    updated_at = $7
WHERE id = $1
RETURNING id, title, description, activity_date, activity_time, location, created_at, updated_at
"#;

const SQL_DELETE_ACTIVITY: &str = "DELETE FROM activities WHERE id = $1";

const SQL_SELECT_PARTICIPANTS: &str = r#"
SELECT activity_id, member_id, status, justification
FROM activity_participants
WHERE activity_id = ANY($1)
ORDER BY activity_id, position
"#;

const SQL_UPDATE_PARTICIPATION: &str = r#"
UPDATE activity_participants
SET status = $3,
    justification = $4
WHERE activity_id = $1 AND member_id = $2
"#;

#[derive(Debug, FromRow)]
struct ParticipationRow {
    activity_id: Uuid,
    member_id: Uuid,
    status: ParticipationStatus,
    justification: Option<String>,
}

#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn fetch_participants<'e, E>(
    executor: E,
    activity_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Participation>>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, ParticipationRow>(SQL_SELECT_PARTICIPANTS)
        .bind(activity_ids)
        .fetch_all(executor)
        .await?;

    let mut rosters: HashMap<Uuid, Vec<Participation>> = HashMap::new();
    for row in rows {
        rosters.entry(row.activity_id).or_default().push(Participation {
            member_id: row.member_id,
            status: row.status,
            justification: row.justification,
        });
    }
    Ok(rosters)
}

fn attach(row: ActivityRow, rosters: &mut HashMap<Uuid, Vec<Participation>>) -> Activity {
    let participants = rosters.remove(&row.id).unwrap_or_default();
    row.with_participants(participants)
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn list(&self) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, ActivityRow>(SQL_SELECT_ACTIVITIES)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut rosters = fetch_participants(&self.pool, &ids).await?;

        Ok(rows.into_iter().map(|row| attach(row, &mut rosters)).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Activity>> {
        let Some(row) = sqlx::query_as::<_, ActivityRow>(SQL_SELECT_ACTIVITY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut rosters = fetch_participants(&self.pool, &[id]).await?;
        Ok(Some(attach(row, &mut rosters)))
    }

    async fn create(&self, details: &ActivityRequest, participants: &[Uuid]) -> AppResult<Activity> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ActivityRow>(SQL_INSERT_ACTIVITY)
            .bind(Uuid::new_v4())
            .bind(details.title.trim())
            .bind(details.description.trim())
            .bind(details.date)
            .bind(&details.time)
            .bind(details.location.trim())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(SQL_INSERT_PARTICIPANTS)
            .bind(row.id)
            .bind(participants)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let roster = participants.iter().copied().map(Participation::pending).collect();
        Ok(row.with_participants(roster))
    }

    async fn update_details(
        &self,
        id: Uuid,
        details: &ActivityRequest,
    ) -> AppResult<Option<Activity>> {
        let Some(row) = sqlx::query_as::<_, ActivityRow>(SQL_UPDATE_ACTIVITY)
            .bind(id)
            .bind(details.title.trim())
            .bind(details.description.trim())
            .bind(details.date)
            .bind(&details.time)
            .bind(details.location.trim())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut rosters = fetch_participants(&self.pool, &[id]).await?;
        Ok(Some(attach(row, &mut rosters)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Activity>> {
        let mut tx = self.pool.begin().await?;

        let Some(row) = sqlx::query_as::<_, ActivityRow>(SQL_SELECT_ACTIVITY)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        let mut rosters = fetch_participants(&mut *tx, &[id]).await?;

        // Roster rows go with it (ON DELETE CASCADE)
        sqlx::query(SQL_DELETE_ACTIVITY)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(attach(row, &mut rosters)))
    }

    async fn set_participation(
        &self,
        activity_id: Uuid,
        member_id: Uuid,
        change: &ParticipationChange,
    ) -> AppResult<Option<Activity>> {
        let result = sqlx::query(SQL_UPDATE_PARTICIPATION)
            .bind(activity_id)
            .bind(member_id)
            .bind(change.status())
            .bind(change.justification())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(activity_id).await
    }
}
