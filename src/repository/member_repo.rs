use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Member, MemberPatch, NewMember};
use crate::repository::{conflict_on_unique, MemberRepository};
use crate::utils::error::AppResult;

const SQL_SELECT_MEMBERS: &str = r#"
SELECT id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
FROM members
ORDER BY created_at ASC, id ASC
"#;

const SQL_SELECT_NON_ADMIN_MEMBERS: &str = r#"
SELECT id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
FROM members
WHERE NOT ('administrator'::member_role = ANY(roles))
ORDER BY created_at ASC, id ASC
"#;

const SQL_SELECT_MEMBER: &str = r#"
SELECT id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
FROM members
WHERE id = $1
"#;

const SQL_SELECT_MEMBER_BY_EMAIL: &str = r#"
SELECT id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
FROM members
WHERE lower(email) = lower($1)
"#;

const SQL_INSERT_MEMBER: &str = r#"
INSERT INTO members (id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
RETURNING id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
"#;

const SQL_UPDATE_MEMBER: &str = r#"
UPDATE members
SET username = COALESCE($2, username),
    rut = COALESCE($3, rut),
    birthdate = COALESCE($4, birthdate),
    phone = COALESCE($5, phone),
    email = COALESCE($6, email),
    instrument = COALESCE($7, instrument),
    roles = COALESCE($8, roles),
    updated_at = $9
WHERE id = $1
RETURNING id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
"#;

const SQL_DELETE_MEMBER: &str = r#"
DELETE FROM members
WHERE id = $1
RETURNING id, username, rut, birthdate, phone, email, instrument, roles, created_at, updated_at
"#;

const DUPLICATE_MEMBER: &str = "A member with that email or RUT already exists.";

#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn list(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(SQL_SELECT_MEMBERS)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn list_non_admin(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(SQL_SELECT_NON_ADMIN_MEMBERS)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(SQL_SELECT_MEMBER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(SQL_SELECT_MEMBER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn create(&self, member: &NewMember) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(SQL_INSERT_MEMBER)
            .bind(Uuid::new_v4())
            .bind(member.username.trim())
            .bind(&member.rut)
            .bind(member.birthdate)
            .bind(&member.phone)
            .bind(member.email.trim())
            .bind(member.instrument.as_deref())
            .bind(&member.roles)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_MEMBER))
    }

    async fn update(&self, id: Uuid, patch: MemberPatch) -> AppResult<Option<Member>> {
        sqlx::query_as::<_, Member>(SQL_UPDATE_MEMBER)
            .bind(id)
            .bind(patch.username.as_deref().map(str::trim))
            .bind(patch.rut)
            .bind(patch.birthdate)
            .bind(patch.phone)
            .bind(patch.email.as_deref().map(str::trim))
            .bind(patch.instrument)
            .bind(patch.roles)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_MEMBER))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(SQL_DELETE_MEMBER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }
}
